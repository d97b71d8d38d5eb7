// src/application/dto/panel.rs
use crate::domain::instance::{Announcement, Image, Instance, Node};
use crate::domain::plan::PlanData;
use serde::Serialize;

pub const DEFAULT_PANEL_NAME: &str = "DracoPanel";

/// Name, logo and free-form settings shared by every page.
#[derive(Debug, Clone, Serialize)]
pub struct PanelBranding {
    pub name: String,
    pub logo: Option<String>,
    pub settings: serde_json::Value,
}

impl Default for PanelBranding {
    fn default() -> Self {
        Self {
            name: DEFAULT_PANEL_NAME.to_string(),
            logo: None,
            settings: serde_json::Value::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InstancesPageData {
    #[serde(flatten)]
    pub branding: PanelBranding,
    pub announcements: Vec<Announcement>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(flatten)]
    pub branding: PanelBranding,
    pub instances: Vec<Instance>,
    pub admin_instances: Vec<Instance>,
    pub plan_data: PlanData,
    pub nodes: Vec<Node>,
    pub images: Vec<Image>,
}

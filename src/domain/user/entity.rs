// src/domain/user/entity.rs
use crate::domain::plan::PlanTier;
use serde::{Deserialize, Serialize};

/// A panel account as stored in the `users` list. Fields the panel does not
/// know about are kept in `extra` so rewriting the list does not lose them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelUser {
    pub user_id: String,
    pub username: String,
    /// Argon2 PHC string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub admin: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(default)]
    pub access_to: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl PanelUser {
    pub fn new(user_id: String, username: String, password_hash: String, admin: bool) -> Self {
        Self {
            user_id,
            username,
            password: Some(password_hash),
            admin,
            plan: None,
            access_to: Vec::new(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn plan_tier(&self) -> PlanTier {
        PlanTier::resolve(self.plan.as_deref())
    }

    pub fn set_plan(&mut self, tier: PlanTier) {
        self.plan = Some(tier.as_str().to_string());
    }
}

use std::sync::Arc;

use crate::application::{
    dto::{InstancesPageData, PanelBranding},
    error::ApplicationResult,
};
use crate::domain::instance::{Announcement, Instance};
use crate::domain::store::{JsonStore, keys};
use crate::domain::user::UserRepository;

pub struct PanelQueryService {
    pub(super) store: JsonStore,
    pub(super) user_repo: Arc<dyn UserRepository>,
}

impl PanelQueryService {
    pub fn new(store: JsonStore, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { store, user_repo }
    }

    pub async fn branding(&self) -> ApplicationResult<PanelBranding> {
        let mut branding = PanelBranding::default();
        if let Some(name) = self.store.get::<String>(keys::NAME).await? {
            branding.name = name;
        }
        branding.logo = self.store.get(keys::LOGO).await?;
        branding.settings = self
            .store
            .get(keys::SETTINGS)
            .await?
            .unwrap_or(serde_json::Value::Null);
        Ok(branding)
    }

    pub async fn instances_page(&self) -> ApplicationResult<InstancesPageData> {
        let branding = self.branding().await?;
        let announcements: Vec<Announcement> = match self.store.get(keys::ANNOUNCEMENTS).await? {
            Some(announcements) => announcements,
            None => self.store.get_or_default(keys::LEGACY_ANNOUNCEMENTS).await?,
        };
        Ok(InstancesPageData {
            branding,
            announcements: announcements.into_iter().filter(|a| a.active).collect(),
        })
    }

    /// Instances visible to an API key: the owner's list for user-bound keys,
    /// every instance otherwise.
    pub async fn instances_for(&self, owner: Option<&str>) -> ApplicationResult<Vec<Instance>> {
        let key = match owner {
            Some(user_id) => keys::user_instances(user_id),
            None => keys::INSTANCES.to_string(),
        };
        Ok(self.store.get_or_default(&key).await?)
    }
}

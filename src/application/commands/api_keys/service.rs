// src/application/commands/api_keys/service.rs
use std::sync::Arc;

use crate::application::{
    ApplicationResult,
    ports::{security::ApiKeyHasher, time::Clock},
    services::audit_logger::AuditLogger,
};
use crate::domain::api_key::ApiKey;
use crate::domain::store::{JsonStore, keys};
use tokio::sync::Mutex;

pub struct ApiKeyCommandService {
    pub(super) store: JsonStore,
    pub(super) hasher: Arc<dyn ApiKeyHasher>,
    pub(super) audit: Arc<AuditLogger>,
    pub(super) clock: Arc<dyn Clock>,
    /// Serializes read-modify-write cycles on the `apiKeys` list.
    pub(super) write_lock: Mutex<()>,
}

impl ApiKeyCommandService {
    pub fn new(
        store: JsonStore,
        hasher: Arc<dyn ApiKeyHasher>,
        audit: Arc<AuditLogger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            hasher,
            audit,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub(super) async fn load_keys(&self) -> ApplicationResult<Vec<ApiKey>> {
        Ok(self.store.get_or_default(keys::API_KEYS).await?)
    }

    pub(super) async fn save_keys(&self, api_keys: &[ApiKey]) -> ApplicationResult<()> {
        Ok(self.store.set(keys::API_KEYS, api_keys).await?)
    }
}

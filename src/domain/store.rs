// src/domain/store.rs
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;

/// Flat key-value persistence. Values are JSON documents serialized to text.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;
    async fn set(&self, key: &str, value: String) -> DomainResult<()>;
    async fn delete(&self, key: &str) -> DomainResult<bool>;
}

/// Well-known keys of the panel's key-value layout.
pub mod keys {
    pub const AUDITS: &str = "audits";
    pub const API_KEYS: &str = "apiKeys";
    pub const USERS: &str = "users";
    pub const INSTANCES: &str = "instances";
    pub const NODES: &str = "nodes";
    pub const IMAGES: &str = "images";
    pub const ANNOUNCEMENTS: &str = "announcements";
    /// Announcement list as the previous panel named it.
    pub const LEGACY_ANNOUNCEMENTS: &str = "avisos";
    pub const PLANS: &str = "plans";
    pub const NAME: &str = "name";
    pub const LOGO: &str = "logo";
    pub const SETTINGS: &str = "settings";

    pub fn user_instances(user_id: &str) -> String {
        format!("{user_id}_instances")
    }

    pub fn instance(instance_id: &str) -> String {
        format!("{instance_id}_instance")
    }

    pub fn node(node_id: &str) -> String {
        format!("{node_id}_node")
    }
}

/// Typed JSON access on top of a [`KeyValueStore`].
#[derive(Clone)]
pub struct JsonStore {
    inner: Arc<dyn KeyValueStore>,
}

impl JsonStore {
    pub fn new(inner: Arc<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    pub fn raw(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> DomainResult<Option<T>> {
        let Some(text) = self.inner.get(key).await? else {
            return Ok(None);
        };
        decode(key, &text).map(Some)
    }

    pub async fn get_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> DomainResult<T> {
        Ok(self.get(key).await?.unwrap_or_default())
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> DomainResult<()> {
        let text = serde_json::to_string(value).map_err(|err| DomainError::Serialization {
            key: key.to_string(),
            message: err.to_string(),
        })?;
        self.inner.set(key, text).await
    }

    pub async fn delete(&self, key: &str) -> DomainResult<bool> {
        self.inner.delete(key).await
    }
}

fn decode<T: DeserializeOwned>(key: &str, text: &str) -> DomainResult<T> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|err| DomainError::Serialization {
            key: key.to_string(),
            message: err.to_string(),
        })?;

    match serde_json::from_value::<T>(value.clone()) {
        Ok(decoded) => Ok(decoded),
        // Older writers stored some lists as a JSON string holding the JSON text.
        Err(first) => match value {
            serde_json::Value::String(inner) => {
                serde_json::from_str(&inner).map_err(|err| DomainError::Serialization {
                    key: key.to_string(),
                    message: err.to_string(),
                })
            }
            _ => Err(DomainError::Serialization {
                key: key.to_string(),
                message: first.to_string(),
            }),
        },
    }
}

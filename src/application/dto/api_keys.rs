// src/application/dto/api_keys.rs
use crate::domain::api_key::{ApiKey, ApiKeyStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An API key as shown to administrators: everything but the hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeySummary {
    pub id: String,
    pub name: String,
    pub user_id: Option<String>,
    pub status: ApiKeyStatus,
    pub hashed: bool,
    #[serde(with = "crate::domain::serde_time::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::domain::serde_time::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_used: Option<DateTime<Utc>>,
    pub usage_count: u64,
    #[serde(with = "crate::domain::serde_time::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<&ApiKey> for ApiKeySummary {
    fn from(key: &ApiKey) -> Self {
        Self {
            id: key.id.clone(),
            name: key.name.clone(),
            user_id: key.user_id.clone(),
            status: key.status,
            hashed: key.hashed,
            created_at: key.created_at,
            last_used: key.last_used,
            usage_count: key.usage_count,
            expires_at: key.expires_at,
        }
    }
}

/// Returned exactly once, right after creation. `plain_key` is not stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedApiKey {
    #[serde(flatten)]
    pub key: ApiKeySummary,
    pub plain_key: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub migrated_count: usize,
    pub total_keys: usize,
}

/// The caller behind a successfully verified API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyPrincipal {
    pub key_id: String,
    pub name: String,
    pub user_id: Option<String>,
}

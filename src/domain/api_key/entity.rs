// src/domain/api_key/entity.rs
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const KEY_NAME_MAX_LEN: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyStatus {
    #[default]
    Active,
    Disabled,
}

/// A stored API key. `key` is a bcrypt hash once `hashed` is set; records
/// written before hashing was introduced still carry the plaintext until the
/// migration runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKey {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub key: String,
    #[serde(default)]
    pub hashed: bool,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default, with = "crate::domain::serde_time::option")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: ApiKeyStatus,
    #[serde(default, with = "crate::domain::serde_time::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::domain::serde_time::option")]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: u64,
    #[serde(
        default,
        with = "crate::domain::serde_time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub migrated_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "crate::domain::serde_time::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub disabled_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    pub fn validate_name(name: &str) -> DomainResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("api key name cannot be empty".into()));
        }
        if trimmed.chars().count() > KEY_NAME_MAX_LEN {
            return Err(DomainError::Validation(format!(
                "api key name must be at most {KEY_NAME_MAX_LEN} characters"
            )));
        }
        Ok(trimmed.to_string())
    }

    pub fn is_active(&self) -> bool {
        self.status == ApiKeyStatus::Active
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Whether this record may be checked against a presented key at all.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active() && self.hashed && !self.is_expired(now)
    }

    pub fn disable(&mut self, now: DateTime<Utc>) {
        self.status = ApiKeyStatus::Disabled;
        self.disabled_at = Some(now);
    }

    pub fn record_use(&mut self, now: DateTime<Utc>) {
        self.last_used = Some(now);
        self.usage_count = self.usage_count.saturating_add(1);
    }

    pub fn mark_migrated(&mut self, hash: String, now: DateTime<Utc>) {
        self.key = hash;
        self.hashed = true;
        self.migrated_at = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn legacy_records_fill_defaults() {
        let key: ApiKey =
            serde_json::from_str(r#"{"id":"k1","name":"legacy","key":"plain"}"#).unwrap();
        assert!(!key.hashed);
        assert_eq!(key.status, ApiKeyStatus::Active);
        assert_eq!(key.usage_count, 0);
        assert!(key.created_at.is_none());
    }

    #[test]
    fn usability_requires_active_hashed_and_unexpired() {
        let mut key: ApiKey =
            serde_json::from_str(r#"{"id":"k1","name":"n","key":"$2b$hash","hashed":true}"#)
                .unwrap();
        assert!(key.is_usable(now()));

        key.expires_at = Some(now() - Duration::seconds(1));
        assert!(!key.is_usable(now()));

        key.expires_at = None;
        key.disable(now());
        assert!(!key.is_usable(now()));
        assert_eq!(key.disabled_at, Some(now()));

        key.status = ApiKeyStatus::Active;
        key.hashed = false;
        assert!(!key.is_usable(now()));
    }

    #[test]
    fn optional_timestamps_are_omitted_until_set() {
        let key: ApiKey =
            serde_json::from_str(r#"{"id":"k1","name":"n","key":"x"}"#).unwrap();
        let json = serde_json::to_value(&key).unwrap();
        assert!(json.get("migratedAt").is_none());
        assert!(json.get("disabledAt").is_none());
        assert!(json["lastUsed"].is_null());
    }

    #[test]
    fn name_validation() {
        assert!(ApiKey::validate_name("   ").is_err());
        assert!(ApiKey::validate_name(&"x".repeat(KEY_NAME_MAX_LEN + 1)).is_err());
        assert_eq!(ApiKey::validate_name("  deploy bot ").unwrap(), "deploy bot");
    }
}

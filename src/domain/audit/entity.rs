// src/domain/audit/entity.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Number of entries kept under the `audits` key. Older entries fall off the
/// front; the daily log files keep everything.
pub const AUDIT_RETENTION: usize = 1000;

const CRITICAL_ACTIONS: &[&str] = &[
    "admin:access_denied",
    "login:failed",
    "plan:change_blocked",
    "error:occurred",
    "validation:failed",
    "unauthorized_access",
];

const WARNING_ACTIONS: &[&str] = &[
    "admin:access_granted",
    "plan:change_attempt",
    "instance:delete",
    "user:delete",
    "config:change",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Keyword classification of an action name. Matching is by substring,
    /// so `api:login:failed:ip` is still critical.
    pub fn classify(action: &str) -> Self {
        if CRITICAL_ACTIONS.iter().any(|needle| action.contains(needle)) {
            Severity::Critical
        } else if WARNING_ACTIONS.iter().any(|needle| action.contains(needle)) {
            Severity::Warning
        } else {
            Severity::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = crate::domain::errors::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            other => Err(crate::domain::errors::DomainError::Validation(format!(
                "unknown severity '{other}'"
            ))),
        }
    }
}

/// One audit record. Decoding is lenient because older writers stored
/// entries without some fields, with free-form severities or with epoch
/// millisecond timestamps. Only an unreadable timestamp rejects an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", try_from = "StoredAuditEntry")]
pub struct AuditEntry {
    pub user_id: String,
    pub username: String,
    pub action: String,
    pub ip: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
    #[serde(with = "crate::domain::serde_time")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
}

impl AuditEntry {
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        action: impl Into<String>,
        ip: impl Into<String>,
        metadata: serde_json::Value,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let action = action.into();
        let severity = Severity::classify(&action);
        Self {
            user_id: user_id.into(),
            username: username.into(),
            action,
            ip: ip.into(),
            metadata,
            timestamp,
            severity,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Shape of an entry as found in storage.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredAuditEntry {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    metadata: serde_json::Value,
    #[serde(default)]
    timestamp: serde_json::Value,
    #[serde(default)]
    severity: Option<String>,
}

const UNKNOWN: &str = "unknown";

fn stored_timestamp(raw: &serde_json::Value) -> Result<DateTime<Utc>, String> {
    match raw {
        serde_json::Value::String(text) => DateTime::parse_from_rfc3339(text)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|err| format!("invalid timestamp '{text}': {err}")),
        serde_json::Value::Number(millis) => millis
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .ok_or_else(|| format!("invalid timestamp {millis}")),
        other => Err(format!("invalid timestamp {other}")),
    }
}

impl TryFrom<StoredAuditEntry> for AuditEntry {
    type Error = String;

    fn try_from(stored: StoredAuditEntry) -> Result<Self, Self::Error> {
        let timestamp = stored_timestamp(&stored.timestamp)?;
        let action = stored.action.unwrap_or_else(|| UNKNOWN.to_string());
        let severity = stored
            .severity
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_else(|| Severity::classify(&action));
        Ok(Self {
            user_id: stored.user_id.unwrap_or_else(|| UNKNOWN.to_string()),
            username: stored.username.unwrap_or_else(|| UNKNOWN.to_string()),
            action,
            ip: stored.ip.unwrap_or_else(|| UNKNOWN.to_string()),
            metadata: stored.metadata,
            timestamp,
            severity,
        })
    }
}

/// Append `entry` and drop the oldest entries beyond [`AUDIT_RETENTION`].
pub fn append_capped<T>(entries: &mut Vec<T>, entry: T) {
    entries.push(entry);
    if entries.len() > AUDIT_RETENTION {
        let overflow = entries.len() - AUDIT_RETENTION;
        entries.drain(..overflow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(action: &str) -> AuditEntry {
        AuditEntry::new(
            "u1",
            "alice",
            action,
            "127.0.0.1",
            serde_json::json!({}),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn classifies_critical_actions() {
        for action in [
            "admin:access_denied",
            "login:failed",
            "plan:change_blocked",
            "error:occurred",
            "validation:failed",
            "unauthorized_access",
        ] {
            assert_eq!(Severity::classify(action), Severity::Critical, "{action}");
        }
    }

    #[test]
    fn classifies_warning_actions() {
        for action in [
            "admin:access_granted",
            "plan:change_attempt",
            "instance:delete",
            "user:delete",
            "config:change",
        ] {
            assert_eq!(Severity::classify(action), Severity::Warning, "{action}");
        }
    }

    #[test]
    fn classification_matches_substrings() {
        assert_eq!(Severity::classify("api:login:failed"), Severity::Critical);
        assert_eq!(Severity::classify("user:delete:success"), Severity::Warning);
        assert_eq!(Severity::classify("api_key:created"), Severity::Info);
        assert_eq!(Severity::classify("plan:change:attempt"), Severity::Info);
    }

    #[test]
    fn critical_wins_over_warning() {
        assert_eq!(
            Severity::classify("admin:access_granted/login:failed"),
            Severity::Critical
        );
    }

    #[test]
    fn serializes_with_camel_case_and_millis() {
        let json = serde_json::to_value(entry("login:failed")).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["severity"], "critical");
        assert_eq!(json["timestamp"], "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn decodes_entries_from_older_writers() {
        let legacy: AuditEntry = serde_json::from_value(serde_json::json!({
            "username": "bob",
            "action": "login:failed",
            "timestamp": 1_704_067_200_000_i64,
            "severity": "HIGH"
        }))
        .unwrap();
        assert_eq!(legacy.user_id, "unknown");
        assert_eq!(legacy.ip, "unknown");
        assert_eq!(legacy.severity, Severity::Critical);
        assert_eq!(legacy.timestamp, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(legacy.metadata, serde_json::Value::Null);
    }

    #[test]
    fn unreadable_timestamp_is_rejected() {
        let result = serde_json::from_value::<AuditEntry>(serde_json::json!({
            "action": "x",
            "timestamp": "yesterday"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn append_capped_keeps_the_newest_entries() {
        let mut entries = Vec::new();
        for i in 0..(AUDIT_RETENTION + 5) {
            append_capped(&mut entries, entry(&format!("action:{i}")));
        }
        assert_eq!(entries.len(), AUDIT_RETENTION);
        assert_eq!(entries[0].action, "action:5");
        assert_eq!(
            entries.last().map(|e| e.action.as_str()),
            Some(format!("action:{}", AUDIT_RETENTION + 4).as_str())
        );
    }
}

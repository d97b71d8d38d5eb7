// src/domain/audit/filter.rs
use super::entity::{AuditEntry, Severity};
use chrono::{DateTime, Utc};

pub const DEFAULT_LIMIT: usize = 100;
pub const MAX_LIMIT: usize = 1000;

/// Criteria for reading back audit entries. Every criterion is optional and
/// they combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    pub user_id: Option<String>,
    /// Substring of the action name.
    pub action: Option<String>,
    pub severity: Option<Severity>,
    /// Inclusive lower bound.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound.
    pub end: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(user_id) = &self.user_id {
            if &entry.user_id != user_id {
                return false;
            }
        }
        if let Some(action) = &self.action {
            if !entry.action.contains(action.as_str()) {
                return false;
            }
        }
        if let Some(severity) = self.severity {
            if entry.severity != severity {
                return false;
            }
        }
        if let Some(start) = self.start {
            if entry.timestamp < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if entry.timestamp > end {
                return false;
            }
        }
        true
    }

    pub fn effective_limit(&self) -> usize {
        match self.limit {
            Some(0) | None => DEFAULT_LIMIT,
            Some(limit) => limit.min(MAX_LIMIT),
        }
    }

    /// Filter `entries` keeping storage order and return the first matches up
    /// to the effective limit.
    pub fn apply(&self, entries: Vec<AuditEntry>) -> Vec<AuditEntry> {
        let limit = self.effective_limit();
        entries
            .into_iter()
            .filter(|entry| self.matches(entry))
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(minutes: i64, user: &str, action: &str) -> AuditEntry {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        AuditEntry::new(
            user,
            user,
            action,
            "10.0.0.1",
            serde_json::Value::Null,
            base + Duration::minutes(minutes),
        )
    }

    fn sample() -> Vec<AuditEntry> {
        vec![
            at(0, "u1", "login:success"),
            at(1, "u2", "login:failed"),
            at(2, "u1", "admin:access_granted"),
            at(3, "u1", "api_key:created"),
            at(4, "u3", "login:failed"),
        ]
    }

    #[test]
    fn empty_filter_returns_everything_in_order() {
        let out = AuditFilter::default().apply(sample());
        assert_eq!(out.len(), 5);
        assert_eq!(out[0].action, "login:success");
    }

    #[test]
    fn filters_by_user_and_action_substring() {
        let filter = AuditFilter {
            user_id: Some("u1".into()),
            action: Some("admin".into()),
            ..Default::default()
        };
        let out = filter.apply(sample());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].action, "admin:access_granted");
    }

    #[test]
    fn filters_by_severity() {
        let filter = AuditFilter {
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        let out = filter.apply(sample());
        assert!(out.iter().all(|e| e.action == "login:failed"));
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let filter = AuditFilter {
            start: Some(base + Duration::minutes(1)),
            end: Some(base + Duration::minutes(3)),
            ..Default::default()
        };
        let out = filter.apply(sample());
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn limit_takes_the_first_matches() {
        let filter = AuditFilter {
            limit: Some(2),
            ..Default::default()
        };
        let out = filter.apply(sample());
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].action, "login:failed");
    }

    #[test]
    fn limit_is_defaulted_and_capped() {
        assert_eq!(AuditFilter::default().effective_limit(), DEFAULT_LIMIT);
        let zero = AuditFilter {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(zero.effective_limit(), DEFAULT_LIMIT);
        let huge = AuditFilter {
            limit: Some(50_000),
            ..Default::default()
        };
        assert_eq!(huge.effective_limit(), MAX_LIMIT);
    }
}

use super::AuditQueryService;
use crate::{
    application::error::{ApplicationError, ApplicationResult},
    domain::audit::{AuditEntry, AuditFilter, Severity},
    domain::store::keys,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::warn;

/// Raw query-string criteria. Dates accept RFC 3339 or `YYYY-MM-DD`.
#[derive(Debug, Clone, Default)]
pub struct ListAuditLogsQuery {
    pub user_id: Option<String>,
    pub action: Option<String>,
    pub severity: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}

impl ListAuditLogsQuery {
    pub fn into_filter(self) -> ApplicationResult<AuditFilter> {
        let severity = non_empty(self.severity)
            .map(|raw| raw.parse::<Severity>())
            .transpose()
            .map_err(ApplicationError::from)?;
        let start = non_empty(self.start_date)
            .map(|raw| parse_bound(&raw, Bound::Start))
            .transpose()?;
        let end = non_empty(self.end_date)
            .map(|raw| parse_bound(&raw, Bound::End))
            .transpose()?;

        Ok(AuditFilter {
            user_id: non_empty(self.user_id),
            action: non_empty(self.action),
            severity,
            start,
            end,
            limit: self.limit,
        })
    }
}

impl AuditQueryService {
    pub async fn list_audit_logs(
        &self,
        query: ListAuditLogsQuery,
    ) -> ApplicationResult<Vec<AuditEntry>> {
        let filter = query.into_filter()?;
        let stored: Vec<serde_json::Value> = self.store.get_or_default(keys::AUDITS).await?;
        let entries = stored
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_json::from_value::<AuditEntry>(raw) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(index, error = %err, "skipping unreadable audit entry");
                    None
                }
            })
            .collect();
        Ok(filter.apply(entries))
    }
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_bound(raw: &str, bound: Bound) -> ApplicationResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApplicationError::validation(format!("invalid date '{raw}'")))?;
    // A bare end date covers the whole day.
    let time = match bound {
        Bound::Start => NaiveTime::MIN,
        Bound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };
    Ok(date.and_time(time).and_utc())
}

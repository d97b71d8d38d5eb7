// src/application/services/audit_logger.rs
use crate::application::ports::{audit::AuditSink, time::Clock};
use crate::domain::audit::{AuditEntry, append_capped};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::store::{JsonStore, keys};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, warn};

/// Who performed an audited action and from where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditActor {
    pub user_id: String,
    pub username: String,
    pub ip: String,
}

impl AuditActor {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>, ip: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
            ip: ip.into(),
        }
    }

    pub fn anonymous(ip: impl Into<String>) -> Self {
        Self::new("anonymous", "anonymous", ip)
    }

    /// Background jobs and maintenance binaries.
    pub fn system(username: impl Into<String>) -> Self {
        Self::new("system", username, "localhost")
    }
}

/// Appends entries to the capped `audits` list and mirrors them to the sink.
///
/// Logging never fails the caller: store and sink errors are reported through
/// `tracing` and the entry is still returned. The sink receives every entry,
/// including ones the store could not take.
pub struct AuditLogger {
    store: JsonStore,
    sink: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    pub fn new(store: JsonStore, sink: Arc<dyn AuditSink>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            sink,
            clock,
            write_lock: Mutex::new(()),
        }
    }

    pub async fn log(
        &self,
        actor: &AuditActor,
        action: impl Into<String>,
        metadata: serde_json::Value,
    ) -> AuditEntry {
        let entry = AuditEntry::new(
            actor.user_id.clone(),
            actor.username.clone(),
            action,
            actor.ip.clone(),
            metadata,
            self.clock.now(),
        );

        if let Err(err) = self.store_entry(&entry).await {
            error!(error = %err, action = %entry.action, "failed to save audit entries");
        }

        if let Err(err) = self.sink.append(&entry).await {
            error!(error = %err, action = %entry.action, "failed to write audit entry to log file");
        }

        if entry.is_critical() {
            raise_alert(&entry);
        }

        entry
    }

    /// Append to the stored list as raw JSON so entries this build cannot
    /// decode survive the rewrite. An unreadable list is never overwritten.
    async fn store_entry(&self, entry: &AuditEntry) -> DomainResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut entries: Vec<serde_json::Value> = self.store.get_or_default(keys::AUDITS).await?;
        let value = serde_json::to_value(entry).map_err(|err| DomainError::Serialization {
            key: keys::AUDITS.to_string(),
            message: err.to_string(),
        })?;
        append_capped(&mut entries, value);
        self.store.set(keys::AUDITS, &entries).await
    }
}

fn raise_alert(entry: &AuditEntry) {
    warn!(
        target: "security_alert",
        action = %entry.action,
        user = %entry.username,
        ip = %entry.ip,
        timestamp = %crate::domain::serde_time::format(&entry.timestamp),
        metadata = %entry.metadata,
        "security alert"
    );
}

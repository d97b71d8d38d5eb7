// src/application/ports/audit.rs
use crate::application::ApplicationResult;
use crate::domain::audit::AuditEntry;
use async_trait::async_trait;

/// Durable, unbounded copy of the audit trail (the store only keeps the most
/// recent entries).
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &AuditEntry) -> ApplicationResult<()>;
}

// tests/support/mocks/audit.rs
use async_trait::async_trait;
use draco_panel::application::{ApplicationResult, ports::audit::AuditSink};
use draco_panel::domain::audit::AuditEntry;
use std::sync::Mutex;

/// Collects every entry the logger mirrors to its sink.
#[derive(Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.entries().into_iter().map(|e| e.action).collect()
    }

    pub fn find(&self, action: &str) -> Option<AuditEntry> {
        self.entries().into_iter().find(|e| e.action == action)
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, entry: &AuditEntry) -> ApplicationResult<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

// src/infrastructure/audit_file.rs
use crate::application::{
    ApplicationResult, error::ApplicationError, ports::audit::AuditSink,
};
use crate::domain::audit::AuditEntry;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};

/// Writes one JSON object per line to `<dir>/audit-<YYYY-MM-DD>.log`, the date
/// being the entry's UTC date.
#[derive(Debug, Clone)]
pub struct FileAuditSink {
    dir: PathBuf,
}

impl FileAuditSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_for(&self, entry: &AuditEntry) -> PathBuf {
        let date = entry.timestamp.format("%Y-%m-%d");
        self.dir.join(format!("audit-{date}.log"))
    }
}

#[async_trait]
impl AuditSink for FileAuditSink {
    async fn append(&self, entry: &AuditEntry) -> ApplicationResult<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;

        let mut line = serde_json::to_string(entry)
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.file_for(entry))
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))?;
        file.flush()
            .await
            .map_err(|err| ApplicationError::infrastructure(err.to_string()))
    }
}

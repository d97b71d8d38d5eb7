// src/domain/audit/mod.rs
pub mod entity;
pub mod filter;

pub use entity::{AUDIT_RETENTION, AuditEntry, Severity, append_capped};
pub use filter::AuditFilter;

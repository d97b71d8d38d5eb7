// src/application/ports/time.rs
use chrono::{DateTime, Utc};

/// Source of "now" for timestamps on audit entries, keys and sessions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

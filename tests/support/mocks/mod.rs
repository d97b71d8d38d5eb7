// tests/support/mocks/mod.rs
//! テストサポートモック再エクスポートモジュール
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod audit;
pub mod security;
pub mod time;

pub use audit::MemoryAuditSink;
pub use security::{FailingApiKeyHasher, PlainPasswordHasher};
pub use time::{FixedClock, fixed_now};

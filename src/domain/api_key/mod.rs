// src/domain/api_key/mod.rs
pub mod entity;

pub use entity::{ApiKey, ApiKeyStatus, KEY_NAME_MAX_LEN};

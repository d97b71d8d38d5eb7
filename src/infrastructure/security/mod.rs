// src/infrastructure/security/mod.rs
pub mod api_key_hasher;
pub mod csrf;
pub mod password;
pub mod session_store;

pub use api_key_hasher::DEFAULT_BCRYPT_COST;

use crate::application::{ApplicationResult, error::ApplicationError};

/// Run CPU-heavy hashing off the async workers.
pub(crate) async fn run_blocking<T, F>(work: F) -> ApplicationResult<T>
where
    F: FnOnce() -> ApplicationResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| ApplicationError::infrastructure(err.to_string()))?
}

// src/application/ports/security.rs
use crate::application::ApplicationResult;
use async_trait::async_trait;

#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> ApplicationResult<String>;
    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()>;
}

/// Salted one-way hashing for API key secrets.
#[async_trait]
pub trait ApiKeyHasher: Send + Sync {
    async fn hash(&self, plain: &str) -> ApplicationResult<String>;
    /// `Ok(false)` on mismatch; errors are reserved for malformed hashes.
    async fn verify(&self, plain: &str, hash: &str) -> ApplicationResult<bool>;
}

// tests/support/mocks/security.rs
use async_trait::async_trait;
use draco_panel::application::{
    ApplicationResult,
    error::ApplicationError,
    ports::security::{ApiKeyHasher, PasswordHasher},
};

/// Reversible "hash" so tests avoid argon2's cost.
#[derive(Default, Clone, Copy)]
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, password: &str) -> ApplicationResult<String> {
        Ok(format!("plain:{password}"))
    }

    async fn verify(&self, password: &str, expected_hash: &str) -> ApplicationResult<()> {
        if expected_hash == format!("plain:{password}") {
            Ok(())
        } else {
            Err(ApplicationError::unauthorized("invalid credentials"))
        }
    }
}

/// API key hasher whose every call fails, as when the bcrypt worker dies.
#[derive(Default, Clone, Copy)]
pub struct FailingApiKeyHasher;

#[async_trait]
impl ApiKeyHasher for FailingApiKeyHasher {
    async fn hash(&self, _plain: &str) -> ApplicationResult<String> {
        Err(ApplicationError::infrastructure("hashing backend unavailable"))
    }

    async fn verify(&self, _plain: &str, _hash: &str) -> ApplicationResult<bool> {
        Err(ApplicationError::infrastructure("hashing backend unavailable"))
    }
}

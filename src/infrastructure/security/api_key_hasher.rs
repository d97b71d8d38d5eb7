// src/infrastructure/security/api_key_hasher.rs
use super::run_blocking;
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::security::ApiKeyHasher,
};
use async_trait::async_trait;

pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Clone)]
pub struct BcryptApiKeyHasher {
    cost: u32,
}

impl BcryptApiKeyHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptApiKeyHasher {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

#[async_trait]
impl ApiKeyHasher for BcryptApiKeyHasher {
    async fn hash(&self, plain: &str) -> ApplicationResult<String> {
        let plain = plain.to_owned();
        let cost = self.cost;
        run_blocking(move || {
            bcrypt::hash(plain, cost).map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
    }

    async fn verify(&self, plain: &str, hash: &str) -> ApplicationResult<bool> {
        let plain = plain.to_owned();
        let hash = hash.to_owned();
        run_blocking(move || {
            bcrypt::verify(plain, &hash)
                .map_err(|err| ApplicationError::infrastructure(err.to_string()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn salted_hashes_verify() {
        let hasher = BcryptApiKeyHasher::new(4);
        let first = hasher.hash("abc123").await.unwrap();
        let second = hasher.hash("abc123").await.unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$2"));
        assert!(hasher.verify("abc123", &first).await.unwrap());
        assert!(!hasher.verify("abc124", &second).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = BcryptApiKeyHasher::new(4);
        assert!(hasher.verify("abc", "plaintext-key").await.is_err());
    }
}

// src/application/commands/api_keys/create.rs
use super::ApiKeyCommandService;
use crate::application::{
    dto::{ApiKeySummary, CreatedApiKey},
    error::{ApplicationError, ApplicationResult},
    services::audit_logger::AuditActor,
};
use crate::domain::api_key::{ApiKey, ApiKeyStatus};
use chrono::{DateTime, Utc};
use rand::{RngCore, rngs::OsRng};
use serde_json::json;

const PLAIN_KEY_BYTES: usize = 32;

pub struct CreateApiKeyCommand {
    pub name: String,
    pub user_id: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

fn generate_plain_key() -> String {
    let mut bytes = [0u8; PLAIN_KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl ApiKeyCommandService {
    /// Create a key and return its plaintext. Only the bcrypt hash is stored.
    pub async fn create(
        &self,
        actor: &AuditActor,
        command: CreateApiKeyCommand,
    ) -> ApplicationResult<CreatedApiKey> {
        let name = ApiKey::validate_name(&command.name)?;
        let now = self.clock.now();
        if command.expires_at.is_some_and(|expires_at| expires_at <= now) {
            return Err(ApplicationError::validation("expiresAt must be in the future"));
        }

        let plain_key = generate_plain_key();
        let hash = self.hasher.hash(&plain_key).await?;

        let api_key = ApiKey {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            key: hash,
            hashed: true,
            user_id: command.user_id,
            expires_at: command.expires_at,
            status: ApiKeyStatus::Active,
            created_at: Some(now),
            last_used: None,
            usage_count: 0,
            migrated_at: None,
            disabled_at: None,
        };

        {
            let _guard = self.write_lock.lock().await;
            let mut api_keys = self.load_keys().await?;
            api_keys.push(api_key.clone());
            self.save_keys(&api_keys).await?;
        }

        self.audit
            .log(
                actor,
                "api_key:created",
                json!({
                    "keyId": api_key.id,
                    "keyName": api_key.name,
                    "expiresAt": api_key.expires_at.as_ref().map(crate::domain::serde_time::format),
                }),
            )
            .await;

        Ok(CreatedApiKey {
            key: ApiKeySummary::from(&api_key),
            plain_key,
        })
    }
}

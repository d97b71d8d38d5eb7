// src/application/commands/api_keys/authenticate.rs
use super::ApiKeyCommandService;
use crate::application::{
    dto::ApiKeyPrincipal,
    error::{ApplicationError, ApplicationResult},
    services::audit_logger::AuditActor,
};
use crate::domain::api_key::ApiKey;
use serde_json::json;
use tracing::warn;

impl ApiKeyCommandService {
    /// Resolve a presented plaintext key. Only active, hashed, unexpired keys
    /// are candidates; a match bumps `lastUsed` and `usageCount`.
    pub async fn authenticate(&self, presented: &str, ip: &str) -> ApplicationResult<ApiKeyPrincipal> {
        match self.find_and_touch(presented).await? {
            Some(principal) => Ok(principal),
            None => {
                self.audit
                    .log(
                        &AuditActor::anonymous(ip),
                        "unauthorized_access",
                        json!({ "reason": "invalid_api_key" }),
                    )
                    .await;
                Err(ApplicationError::unauthorized("invalid API key"))
            }
        }
    }

    async fn find_and_touch(&self, presented: &str) -> ApplicationResult<Option<ApiKeyPrincipal>> {
        if presented.trim().is_empty() {
            return Ok(None);
        }

        // Verification runs on a snapshot; bcrypt never holds the write lock.
        let snapshot = self.load_keys().await?;
        let Some(key_id) = self.verify_against(&snapshot, presented).await else {
            return Ok(None);
        };

        let _guard = self.write_lock.lock().await;
        let mut api_keys = self.load_keys().await?;
        let now = self.clock.now();
        let Some(api_key) = api_keys
            .iter_mut()
            .find(|api_key| api_key.id == key_id && api_key.is_usable(now))
        else {
            // Disabled or removed while the hash was being checked.
            return Ok(None);
        };

        api_key.record_use(now);
        let principal = ApiKeyPrincipal {
            key_id: api_key.id.clone(),
            name: api_key.name.clone(),
            user_id: api_key.user_id.clone(),
        };
        self.save_keys(&api_keys).await?;
        Ok(Some(principal))
    }

    async fn verify_against(&self, api_keys: &[ApiKey], presented: &str) -> Option<String> {
        let now = self.clock.now();
        for api_key in api_keys {
            if !api_key.hashed {
                warn!(key_id = %api_key.id, "skipping unhashed api key; run the api key migration");
                continue;
            }
            if !api_key.is_usable(now) {
                continue;
            }
            match self.hasher.verify(presented, &api_key.key).await {
                Ok(true) => return Some(api_key.id.clone()),
                Ok(false) => {}
                Err(err) => warn!(key_id = %api_key.id, error = %err, "unreadable api key hash"),
            }
        }
        None
    }
}

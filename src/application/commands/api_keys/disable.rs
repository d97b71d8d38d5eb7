// src/application/commands/api_keys/disable.rs
use super::ApiKeyCommandService;
use crate::application::{
    dto::ApiKeySummary,
    error::{ApplicationError, ApplicationResult},
    services::audit_logger::AuditActor,
};
use serde_json::json;

impl ApiKeyCommandService {
    pub async fn disable(&self, actor: &AuditActor, key_id: &str) -> ApplicationResult<ApiKeySummary> {
        let summary = {
            let _guard = self.write_lock.lock().await;
            let mut api_keys = self.load_keys().await?;
            let api_key = api_keys
                .iter_mut()
                .find(|k| k.id == key_id)
                .ok_or_else(|| ApplicationError::not_found(format!("api key {key_id}")))?;
            api_key.disable(self.clock.now());
            let summary = ApiKeySummary::from(&*api_key);
            self.save_keys(&api_keys).await?;
            summary
        };

        self.audit
            .log(
                actor,
                "api_key:disabled",
                json!({ "keyId": summary.id, "keyName": summary.name }),
            )
            .await;

        Ok(summary)
    }
}

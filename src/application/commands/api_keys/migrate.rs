// src/application/commands/api_keys/migrate.rs
use super::ApiKeyCommandService;
use crate::application::{
    dto::MigrationReport, error::ApplicationResult, services::audit_logger::AuditActor,
};
use serde_json::json;
use tracing::{error, info};

impl ApiKeyCommandService {
    /// Replace every plaintext key with its bcrypt hash. Already hashed keys
    /// are left alone, so running this twice is harmless.
    pub async fn migrate(&self) -> ApplicationResult<MigrationReport> {
        let actor = AuditActor::system("migration");
        match self.migrate_inner().await {
            Ok(report) => {
                if report.migrated_count > 0 {
                    self.audit
                        .log(
                            &actor,
                            "api_keys:migration_completed",
                            json!({
                                "migratedCount": report.migrated_count,
                                "totalKeys": report.total_keys,
                            }),
                        )
                        .await;
                    info!(
                        migrated = report.migrated_count,
                        total = report.total_keys,
                        "api key migration completed"
                    );
                } else {
                    info!(total = report.total_keys, "no api keys needed migration");
                }
                Ok(report)
            }
            Err(err) => {
                error!(error = %err, "api key migration failed");
                self.audit
                    .log(
                        &actor,
                        "api_keys:migration_failed",
                        json!({ "error": err.to_string() }),
                    )
                    .await;
                Err(err)
            }
        }
    }

    async fn migrate_inner(&self) -> ApplicationResult<MigrationReport> {
        let _guard = self.write_lock.lock().await;
        let mut api_keys = self.load_keys().await?;
        let mut migrated_count = 0;

        for api_key in api_keys.iter_mut().filter(|k| !k.hashed) {
            let hash = self.hasher.hash(&api_key.key).await?;
            api_key.mark_migrated(hash, self.clock.now());
            migrated_count += 1;
            info!(key_id = %api_key.id, name = %api_key.name, "migrated api key");
        }

        if migrated_count > 0 {
            self.save_keys(&api_keys).await?;
        }

        Ok(MigrationReport {
            migrated_count,
            total_keys: api_keys.len(),
        })
    }
}

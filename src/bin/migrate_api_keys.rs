//! One-shot re-hash of API keys stored in plaintext.
//!
//! Reads the same environment as the server (`DATABASE_URL`, `AUDIT_LOG_DIR`,
//! `API_KEY_BCRYPT_COST`). Exits with status 1 when the migration fails.
use anyhow::{Context, Result};
use draco_panel::application::{
    ports::{
        audit::AuditSink,
        security::{ApiKeyHasher, PasswordHasher},
        session::SessionStore,
        time::Clock,
    },
    services::ApplicationServices,
};
use draco_panel::config::AppConfig;
use draco_panel::domain::store::KeyValueStore;
use draco_panel::infrastructure::{
    audit_file::FileAuditSink,
    database,
    security::{
        api_key_hasher::BcryptApiKeyHasher, password::Argon2PasswordHasher,
        session_store::InMemorySessionStore,
    },
    store::SqliteKeyValueStore,
    time::SystemClock,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    match run().await {
        Ok(()) => {}
        Err(err) => {
            tracing::error!(error = %err, "api key migration failed");
            eprintln!("api key migration failed: {err:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url())
        .await
        .context("opening the key-value database")?;
    database::run_migrations(&pool).await?;

    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(Arc::new(pool)));
    let audit_sink: Arc<dyn AuditSink> = Arc::new(FileAuditSink::new(config.audit_log_dir()));
    let api_key_hasher: Arc<dyn ApiKeyHasher> =
        Arc::new(BcryptApiKeyHasher::new(config.api_key_bcrypt_cost()));
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session_store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
        chrono::Duration::minutes(1),
        Arc::clone(&clock),
    ));

    let services = ApplicationServices::new(
        store,
        audit_sink,
        password_hasher,
        api_key_hasher,
        session_store,
        clock,
    );

    let report = services.api_key_commands.migrate().await?;
    println!(
        "migrated {} of {} api keys",
        report.migrated_count, report.total_keys
    );
    Ok(())
}

use anyhow::{Context, Result};
use draco_panel::application::{
    commands::users::BootstrapAdminCommand,
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
        api_key_hasher::BcryptApiKeyHasher, csrf::CsrfTokens, password::Argon2PasswordHasher,
        session_store::InMemorySessionStore,
    },
    store::SqliteKeyValueStore,
    time::SystemClock,
};
use draco_panel::presentation::http::{
    pages::load_pages,
    routes::build_router_with_rate_limiter,
    state::{HttpSettings, HttpState},
    views::TemplateRenderer,
};
use std::{net::SocketAddr, path::Path, sync::Arc};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    info!(environment = %config.environment(), "starting DracoPanel");

    ensure_sqlite_dir(config.database_url()).await?;
    let pool = database::init_pool(config.database_url())
        .await
        .context("opening the key-value database")?;
    database::run_migrations(&pool).await?;
    let pool = Arc::new(pool);

    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteKeyValueStore::new(Arc::clone(&pool)));
    let audit_sink: Arc<dyn AuditSink> = Arc::new(FileAuditSink::new(config.audit_log_dir()));
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let api_key_hasher: Arc<dyn ApiKeyHasher> =
        Arc::new(BcryptApiKeyHasher::new(config.api_key_bcrypt_cost()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let session_ttl = chrono::Duration::from_std(config.session_ttl())
        .context("session ttl out of range")?;
    let session_store: Arc<dyn SessionStore> =
        Arc::new(InMemorySessionStore::new(session_ttl, Arc::clone(&clock)));

    let services = Arc::new(ApplicationServices::new(
        store,
        audit_sink,
        password_hasher,
        api_key_hasher,
        session_store,
        clock,
    ));

    if let Some((username, password)) = config.admin_credentials() {
        let created = services
            .user_commands
            .ensure_admin(BootstrapAdminCommand {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        if !created {
            info!(%username, "bootstrap administrator already present");
        }
    }

    let csrf = match config.session_secret() {
        Some(secret) => CsrfTokens::new(secret.as_bytes()),
        None => {
            warn!("SESSION_SECRET is not set; CSRF tokens will not survive a restart");
            CsrfTokens::random()
        }
    }
    .map_err(|err| anyhow::anyhow!("invalid session secret: {err}"))?;

    let state = HttpState {
        services,
        views: Arc::new(TemplateRenderer::from_dir(config.templates_dir())),
        csrf: Arc::new(csrf),
        settings: HttpSettings {
            environment: config.environment(),
            session_ttl: config.session_ttl(),
            trust_proxy: config.trust_proxy(),
        },
    };

    let pages = load_pages(config.pages_config()).await;
    let app = build_router_with_rate_limiter(state, pages, config.rate_limit_enabled());

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// SQLite will not create missing parent directories for a file database.
async fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
    else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to install CTRL+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("shutdown signal received");
}

// src/config.rs
use std::{env, fmt, path::PathBuf, str::FromStr, time::Duration};
use thiserror::Error;

pub const MIN_SESSION_SECRET_LEN: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Production,
}

impl AppEnvironment {
    pub fn is_development(self) -> bool {
        self == AppEnvironment::Development
    }
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnvironment::Development),
            "production" | "prod" => Ok(AppEnvironment::Production),
            other => Err(ConfigError::Invalid(format!("APP_ENV: unknown environment '{other}'"))),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
        })
    }
}

#[derive(Clone)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
    environment: AppEnvironment,
    audit_log_dir: PathBuf,
    pages_config: PathBuf,
    templates_dir: PathBuf,
    session_secret: Option<String>,
    session_ttl: Duration,
    api_key_bcrypt_cost: u32,
    admin_credentials: Option<(String, String)>,
    rate_limit_enabled: bool,
    trust_proxy: bool,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url)
            .field("listen_addr", &self.listen_addr)
            .field("environment", &self.environment)
            .field("audit_log_dir", &self.audit_log_dir)
            .field("pages_config", &self.pages_config)
            .field("templates_dir", &self.templates_dir)
            .field("session_secret", &self.session_secret.as_ref().map(|_| "<redacted>"))
            .field("session_ttl", &self.session_ttl)
            .field("api_key_bcrypt_cost", &self.api_key_bcrypt_cost)
            .field(
                "admin_username",
                &self.admin_credentials.as_ref().map(|(name, _)| name),
            )
            .field("rate_limit_enabled", &self.rate_limit_enabled)
            .field("trust_proxy", &self.trust_proxy)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

fn default_database_url() -> String {
    "sqlite://storage/panel.db?mode=rwc".into()
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_session_ttl() -> u64 {
    60 * 60 * 24
}

impl AppConfig {
    /// Build configuration from environment variables, loading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").unwrap_or_else(default_database_url);
        let listen_addr = var("LISTEN_ADDR").unwrap_or_else(default_listen_addr);
        let environment = match var("APP_ENV") {
            Some(raw) => raw.parse()?,
            None => AppEnvironment::Production,
        };

        let audit_log_dir = var("AUDIT_LOG_DIR").unwrap_or_else(|| "storage/logs".into());
        let pages_config = var("PAGES_CONFIG").unwrap_or_else(|| "pages.json".into());
        let templates_dir = var("TEMPLATES_DIR").unwrap_or_else(|| "templates".into());

        let session_secret = var("SESSION_SECRET");
        if let Some(secret) = &session_secret {
            if secret.len() < MIN_SESSION_SECRET_LEN {
                return Err(ConfigError::Invalid(format!(
                    "SESSION_SECRET must be at least {MIN_SESSION_SECRET_LEN} bytes"
                )));
            }
        }

        let session_ttl_secs = match var("SESSION_TTL_SECONDS") {
            Some(raw) => parse_number::<u64>("SESSION_TTL_SECONDS", &raw)?,
            None => default_session_ttl(),
        };
        if session_ttl_secs == 0 {
            return Err(ConfigError::Invalid("SESSION_TTL_SECONDS must be positive".into()));
        }

        let api_key_bcrypt_cost = match var("API_KEY_BCRYPT_COST") {
            Some(raw) => parse_number::<u32>("API_KEY_BCRYPT_COST", &raw)?,
            None => crate::infrastructure::security::DEFAULT_BCRYPT_COST,
        };
        if !(4..=31).contains(&api_key_bcrypt_cost) {
            return Err(ConfigError::Invalid(
                "API_KEY_BCRYPT_COST must be between 4 and 31".into(),
            ));
        }

        let admin_credentials = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some((username, password)),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_USERNAME")),
        };

        let rate_limit_enabled = match var("RATE_LIMIT_ENABLED") {
            Some(raw) => parse_flag("RATE_LIMIT_ENABLED", &raw)?,
            None => true,
        };

        let trust_proxy = match var("TRUST_PROXY") {
            Some(raw) => parse_flag("TRUST_PROXY", &raw)?,
            None => false,
        };

        Ok(Self {
            database_url,
            listen_addr,
            environment,
            audit_log_dir: audit_log_dir.into(),
            pages_config: pages_config.into(),
            templates_dir: templates_dir.into(),
            session_secret,
            session_ttl: Duration::from_secs(session_ttl_secs),
            api_key_bcrypt_cost,
            admin_credentials,
            rate_limit_enabled,
            trust_proxy,
        })
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    pub fn audit_log_dir(&self) -> &PathBuf {
        &self.audit_log_dir
    }

    pub fn pages_config(&self) -> &PathBuf {
        &self.pages_config
    }

    pub fn templates_dir(&self) -> &PathBuf {
        &self.templates_dir
    }

    /// `None` when unset; callers generate a per-process secret.
    pub fn session_secret(&self) -> Option<&str> {
        self.session_secret.as_deref()
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn api_key_bcrypt_cost(&self) -> u32 {
        self.api_key_bcrypt_cost
    }

    /// `(username, password)` of the administrator to create on first start.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        self.admin_credentials
            .as_ref()
            .map(|(user, pass)| (user.as_str(), pass.as_str()))
    }

    pub fn rate_limit_enabled(&self) -> bool {
        self.rate_limit_enabled
    }

    /// Whether a reverse proxy in front of the panel sets `X-Forwarded-For`.
    pub fn trust_proxy(&self) -> bool {
        self.trust_proxy
    }
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{key}: '{raw}' is not a valid number")))
}

fn parse_flag(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(format!("{key}: '{raw}' is not a boolean"))),
    }
}

// src/presentation/http/state.rs
use crate::application::services::ApplicationServices;
use crate::config::AppEnvironment;
use crate::infrastructure::security::csrf::CsrfTokens;
use crate::presentation::http::views::TemplateRenderer;
use std::{sync::Arc, time::Duration};

pub const SESSION_COOKIE: &str = "draco_session";

#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub environment: AppEnvironment,
    pub session_ttl: Duration,
    /// Take the client address from `X-Forwarded-For` instead of the socket.
    pub trust_proxy: bool,
}

impl HttpSettings {
    pub fn secure_cookies(&self) -> bool {
        !self.environment.is_development()
    }
}

#[derive(Clone)]
pub struct HttpState {
    pub services: Arc<ApplicationServices>,
    pub views: Arc<TemplateRenderer>,
    pub csrf: Arc<CsrfTokens>,
    pub settings: HttpSettings,
}

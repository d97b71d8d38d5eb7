// tests/support/builders.rs
use super::helpers::{TestApp, default_pages};
use draco_panel::application::ports::security::ApiKeyHasher;
use draco_panel::config::AppEnvironment;
use draco_panel::infrastructure::security::api_key_hasher::BcryptApiKeyHasher;
use draco_panel::presentation::http::pages::PageConfig;
use std::sync::Arc;

pub struct TestAppBuilder {
    pub(super) environment: AppEnvironment,
    pub(super) pages: Vec<PageConfig>,
    pub(super) trust_proxy: bool,
    pub(super) api_key_hasher: Arc<dyn ApiKeyHasher>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            environment: AppEnvironment::Development,
            pages: default_pages(),
            trust_proxy: false,
            // bcrypt's minimum cost keeps the suite fast.
            api_key_hasher: Arc::new(BcryptApiKeyHasher::new(4)),
        }
    }

    pub fn environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn pages(mut self, pages: Vec<PageConfig>) -> Self {
        self.pages = pages;
        self
    }

    pub fn trust_proxy(mut self) -> Self {
        self.trust_proxy = true;
        self
    }

    pub fn api_key_hasher(mut self, hasher: impl ApiKeyHasher + 'static) -> Self {
        self.api_key_hasher = Arc::new(hasher);
        self
    }

    pub fn build(self) -> TestApp {
        TestApp::from_builder(self)
    }
}

// tests/support/helpers.rs
use super::builders::TestAppBuilder;
use super::mocks::{FixedClock, MemoryAuditSink, PlainPasswordHasher};
use axum::Router;
use axum::body::{self, Body};
use axum::http::{Request, Response, header};
use draco_panel::application::{
    ports::{
        audit::AuditSink,
        security::PasswordHasher,
        session::SessionStore,
        time::Clock,
    },
    services::ApplicationServices,
};
use draco_panel::config::AppEnvironment;
use draco_panel::domain::audit::AuditEntry;
use draco_panel::domain::store::{JsonStore, KeyValueStore, keys};
use draco_panel::domain::user::PanelUser;
use draco_panel::infrastructure::{
    security::{csrf::CsrfTokens, session_store::InMemorySessionStore},
    store::InMemoryKeyValueStore,
};
use draco_panel::presentation::http::{
    pages::PageConfig,
    routes::build_router_with_rate_limiter,
    state::{HttpSettings, HttpState, SESSION_COOKIE},
    views::TemplateRenderer,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt as _;

pub const PASSWORD: &str = "correct horse battery";

/// A fully wired router over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub state: HttpState,
    pub store: JsonStore,
    pub sink: Arc<MemoryAuditSink>,
}

/// Cookie plus matching CSRF token of a signed-in browser.
#[derive(Debug, Clone)]
pub struct BrowserSession {
    pub cookie: String,
    pub session_id: String,
    pub csrf: String,
}

pub fn default_pages() -> Vec<PageConfig> {
    vec![
        PageConfig {
            path: "/dashboard".into(),
            template: "dashboard".into(),
            requires_auth: true,
        },
        PageConfig {
            path: "/about".into(),
            template: "landing".into(),
            requires_auth: false,
        },
    ]
}

impl TestApp {
    pub fn new() -> Self {
        TestAppBuilder::new().build()
    }

    pub fn with_environment(environment: AppEnvironment) -> Self {
        TestAppBuilder::new().environment(environment).build()
    }

    pub fn build(environment: AppEnvironment, pages: Vec<PageConfig>) -> Self {
        TestAppBuilder::new().environment(environment).pages(pages).build()
    }

    pub fn from_builder(builder: TestAppBuilder) -> Self {
        let TestAppBuilder {
            environment,
            pages,
            trust_proxy,
            api_key_hasher,
        } = builder;
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let sink = Arc::new(MemoryAuditSink::default());
        let audit_sink: Arc<dyn AuditSink> = sink.clone();
        let password_hasher: Arc<dyn PasswordHasher> = Arc::new(PlainPasswordHasher);
        let clock: Arc<dyn Clock> = Arc::new(FixedClock);
        let session_store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new(
            chrono::Duration::hours(1),
            Arc::clone(&clock),
        ));

        let services = Arc::new(ApplicationServices::new(
            Arc::clone(&kv),
            audit_sink,
            password_hasher,
            api_key_hasher,
            session_store,
            clock,
        ));

        let state = HttpState {
            services,
            views: Arc::new(TemplateRenderer::from_dir(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/templates"
            ))),
            csrf: Arc::new(CsrfTokens::new(&[7u8; 32]).expect("csrf secret")),
            settings: HttpSettings {
                environment,
                session_ttl: Duration::from_secs(3600),
                trust_proxy,
            },
        };

        let router = build_router_with_rate_limiter(state.clone(), pages, false);
        Self {
            router,
            state,
            store: JsonStore::new(kv),
            sink,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("router is infallible")
    }

    /// Append a user whose password hashes through [`PlainPasswordHasher`].
    pub async fn seed_user(&self, user_id: &str, username: &str, admin: bool) -> PanelUser {
        let user = PanelUser::new(
            user_id.to_string(),
            username.to_string(),
            format!("plain:{PASSWORD}"),
            admin,
        );
        let mut users: Vec<PanelUser> = self.store.get_or_default(keys::USERS).await.unwrap();
        users.push(user.clone());
        self.store.set(keys::USERS, &users).await.unwrap();
        user
    }

    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        self.store.set(key, value).await.unwrap();
    }

    pub async fn get_value(&self, key: &str) -> Option<Value> {
        self.store.get(key).await.unwrap()
    }

    pub async fn audits(&self) -> Vec<AuditEntry> {
        self.store.get_or_default(keys::AUDITS).await.unwrap()
    }

    pub async fn audit_actions(&self) -> Vec<String> {
        self.audits().await.into_iter().map(|e| e.action).collect()
    }

    pub async fn find_audit(&self, action: &str) -> Option<AuditEntry> {
        self.audits().await.into_iter().find(|e| e.action == action)
    }

    pub async fn login(&self, username: &str) -> BrowserSession {
        let resp = self.send(login_request(username, PASSWORD, false)).await;
        assert!(
            resp.status().is_redirection(),
            "login for {username} failed with {}",
            resp.status()
        );
        let session_id = session_id_from(&resp).expect("session cookie");
        BrowserSession {
            cookie: format!("{SESSION_COOKIE}={session_id}"),
            csrf: self.state.csrf.token_for(&session_id),
            session_id,
        }
    }
}

pub fn login_request(username: &str, password: &str, json: bool) -> Request<Body> {
    let body = serde_urlencoded::to_string([("username", username), ("password", password)])
        .expect("form body");
    let mut builder = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if json {
        builder = builder.header(header::ACCEPT, "application/json");
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn session_id_from(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix(&format!("{SESSION_COOKIE}=")))
        .and_then(|rest| rest.split(';').next())
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
}

pub fn get(uri: &str, session: Option<&BrowserSession>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, &session.cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn get_json(uri: &str, session: Option<&BrowserSession>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::ACCEPT, "application/json");
    if let Some(session) = session {
        builder = builder.header(header::COOKIE, &session.cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// JSON mutation carrying the session cookie and its CSRF header.
pub fn send_json(method: &str, uri: &str, session: &BrowserSession, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, &session.cookie)
        .header(header::ACCEPT, "application/json")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-csrf-token", &session.csrf)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

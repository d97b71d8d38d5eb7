// src/presentation/http/routes.rs
use crate::presentation::http::{
    controllers::{admin, api, auth, panel, system, users},
    middleware::{
        audit::log_sensitive_action,
        auth::{require_admin, require_admin_or_self, require_authenticated},
        csrf::csrf_protect,
        errors::sanitize_errors,
        rate_limit::{login_rate_limit_layer, proxied_login_rate_limit_layer},
        session::load_session,
    },
    pages::PageConfig,
    state::HttpState,
};
use axum::{
    Extension, Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub fn build_router_with_rate_limiter(
    state: HttpState,
    pages: Vec<PageConfig>,
    enable_rate_limiter: bool,
) -> Router {
    let mut login_submit = post(auth::login);
    if enable_rate_limiter {
        if state.settings.trust_proxy {
            if let Some(layer) = proxied_login_rate_limit_layer() {
                login_submit = login_submit.layer(layer);
            }
        } else if let Some(layer) = login_rate_limit_layer() {
            login_submit = login_submit.layer(layer);
        }
    }

    let session_pages = Router::new()
        .route("/instances", get(panel::instances))
        .route_layer(from_fn(require_authenticated));

    let admin_api = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/{user_id}/plan",
            put(admin::change_plan)
                .layer(from_fn_with_state("plan:change", log_sensitive_action)),
        )
        .route("/api/admin/audit-logs", get(admin::audit_logs))
        .route(
            "/api/admin/api-keys",
            get(admin::list_api_keys).post(admin::create_api_key),
        )
        .route(
            "/api/admin/api-keys/{key_id}/disable",
            post(admin::disable_api_key),
        )
        .route_layer(from_fn(require_admin));

    let user_api = Router::new()
        .route("/api/users/{user_id}", get(users::get_user))
        .route_layer(from_fn(require_admin_or_self));

    let mut router = Router::new()
        .route("/", get(panel::root))
        .route("/auth/login", get(auth::login_page).merge(login_submit))
        .route("/auth/logout", post(auth::logout))
        .route("/api/v1/instances", get(api::list_instances))
        .route("/health", get(system::health))
        .route("/openapi.json", get(system::openapi_json))
        .route("/js/csrf-universal.js", get(system::csrf_script))
        .merge(session_pages)
        .merge(admin_api)
        .merge(user_api);

    for page in pages {
        router = router.merge(page_router(page));
    }

    router
        .layer(from_fn(csrf_protect))
        .layer(from_fn(sanitize_errors))
        .layer(from_fn(load_session))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(state))
}

fn page_router(page: PageConfig) -> Router {
    let path = page.path.clone();
    let requires_auth = page.requires_auth;
    let router = Router::new().route(
        &path,
        get(panel::configured_page).layer(Extension(Arc::new(page))),
    );
    if requires_auth {
        router.route_layer(from_fn(require_authenticated))
    } else {
        router
    }
}

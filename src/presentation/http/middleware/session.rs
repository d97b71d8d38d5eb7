// src/presentation/http/middleware/session.rs
use crate::presentation::http::{
    extractors::SessionContext,
    state::{HttpState, SESSION_COOKIE},
};
use axum::{
    Extension,
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use headers::{Cookie, HeaderMapExt};
use tracing::{debug, warn};

pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .typed_get::<Cookie>()
        .and_then(|cookie| cookie.get(SESSION_COOKIE).map(str::to_owned))
        .filter(|value| !value.is_empty())
}

/// Resolve the session cookie and attach a [`SessionContext`] for the rest of
/// the stack. Unknown or expired cookies leave the request anonymous.
pub async fn load_session(
    Extension(state): Extension<HttpState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(session_id) = session_cookie(req.headers()) {
        match state.services.resolve_session(&session_id).await {
            Ok(Some(session)) => {
                let csrf_token = state.csrf.token_for(&session.id);
                req.extensions_mut()
                    .insert(SessionContext { session, csrf_token });
            }
            Ok(None) => debug!("ignoring unknown or expired session cookie"),
            Err(err) => warn!(error = %err, "session lookup failed"),
        }
    }
    next.run(req).await
}

/// `Set-Cookie` value starting a session.
pub fn session_cookie_header(session_id: &str, max_age_secs: u64, secure: bool) -> String {
    let mut cookie = format!(
        "{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value clearing the session.
pub fn cleared_session_cookie(secure: bool) -> String {
    session_cookie_header("", 0, secure)
}

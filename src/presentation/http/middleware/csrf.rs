// src/presentation/http/middleware/csrf.rs
use crate::presentation::http::{
    extractors::{SessionContext, audit_actor, client_ip},
    state::HttpState,
};
use axum::{
    Extension,
    body::Body,
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use super::{buffer_body, is_form, json_message};

pub const CSRF_HEADER: &str = "x-csrf-token";
pub const CSRF_FIELD: &str = "_csrf";

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

fn form_field(body: &[u8], name: &str) -> Option<String> {
    serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
        .ok()?
        .into_iter()
        .find_map(|(key, value)| (key == name).then_some(value))
}

/// Mutations made with a session cookie must echo the session's CSRF token.
/// Requests without a session are left to the authentication layers.
pub async fn csrf_protect(
    Extension(state): Extension<HttpState>,
    req: Request,
    next: Next,
) -> Response {
    if !is_mutating(req.method()) {
        return next.run(req).await;
    }
    let Some(ctx) = req.extensions().get::<SessionContext>().cloned() else {
        return next.run(req).await;
    };

    let (parts, body) = req.into_parts();
    let header_token = parts
        .headers
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let (presented, body) = match header_token {
        Some(token) => (Some(token), body),
        None if is_form(&parts.headers) => {
            let bytes = match buffer_body(body).await {
                Ok(bytes) => bytes,
                Err(response) => return response,
            };
            (form_field(&bytes, CSRF_FIELD), Body::from(bytes))
        }
        None => (None, body),
    };

    let valid = presented
        .as_deref()
        .is_some_and(|token| state.csrf.verify(&ctx.session.id, token));

    if !valid {
        let actor = audit_actor(Some(&ctx), client_ip(&parts.headers, &parts.extensions));
        state
            .services
            .audit
            .log(
                &actor,
                "csrf:rejected",
                json!({
                    "path": parts.uri.path(),
                    "method": parts.method.as_str(),
                    "tokenPresent": presented.is_some(),
                }),
            )
            .await;
        return json_message(StatusCode::FORBIDDEN, "Invalid CSRF token");
    }

    next.run(Request::from_parts(parts, body)).await
}

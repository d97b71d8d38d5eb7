// src/presentation/http/middleware/mod.rs
pub mod audit;
pub mod auth;
pub mod csrf;
pub mod errors;
pub mod rate_limit;
pub mod session;
pub mod validation;

use bytes::Bytes;
use axum::{
    Json,
    body::Body,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

/// Upper bound for request bodies the middleware buffers.
pub(crate) const BODY_LIMIT: usize = 1024 * 1024;

pub(crate) async fn buffer_body(body: Body) -> Result<Bytes, Response> {
    axum::body::to_bytes(body, BODY_LIMIT).await.map_err(|_| {
        json_message(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
    })
}

pub(crate) fn content_type_is(headers: &HeaderMap, mime: &str) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with(mime))
}

pub(crate) fn is_form(headers: &HeaderMap) -> bool {
    content_type_is(headers, "application/x-www-form-urlencoded")
}

pub(crate) fn json_message(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "message": message })),
    )
        .into_response()
}

// src/presentation/http/middleware/errors.rs
use crate::presentation::http::{
    error::ErrorDetail,
    extractors::{SessionContext, audit_actor, client_ip},
    state::HttpState,
};
use axum::{
    Extension, Json,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Replace every 5xx body with a generic message and audit the cause. In
/// development the original message is kept under `details`.
pub async fn sanitize_errors(
    Extension(state): Extension<HttpState>,
    req: Request,
    next: Next,
) -> Response {
    let session = req.extensions().get::<SessionContext>().cloned();
    let ip = client_ip(req.headers(), req.extensions());
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    let response = next.run(req).await;
    let status = response.status();
    if !status.is_server_error() {
        return response;
    }

    let detail = response
        .extensions()
        .get::<ErrorDetail>()
        .map(|d| d.0.clone())
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_else(|| "unknown error".to_string());

    error!(%status, %path, %method, error = %detail, "request failed");
    state
        .services
        .audit
        .log(
            &audit_actor(session.as_ref(), ip),
            "error:occurred",
            json!({ "error": detail, "path": path, "method": method.as_str() }),
        )
        .await;

    let mut body = json!({ "success": false, "message": "Internal server error" });
    if state.settings.environment.is_development() {
        body["details"] = json!(detail);
    }
    (status, Json(body)).into_response()
}

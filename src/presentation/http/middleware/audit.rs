// src/presentation/http/middleware/audit.rs
use crate::presentation::http::{
    extractors::{SessionContext, audit_actor, client_ip},
    state::HttpState,
};
use axum::{
    Extension,
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::{Map, Value, json};

use super::{buffer_body, content_type_is, is_form};

const REDACTED_FIELDS: &[&str] = &["password", "_csrf", "plainKey", "key", "token"];

fn redact(mut value: Value) -> Value {
    if let Value::Object(map) = &mut value {
        for (field, entry) in map.iter_mut() {
            if REDACTED_FIELDS.contains(&field.as_str()) {
                *entry = Value::String("[redacted]".into());
            }
        }
    }
    value
}

fn parse_body(is_json: bool, is_form: bool, bytes: &[u8]) -> Value {
    if bytes.is_empty() {
        return Value::Null;
    }
    let parsed = if is_json {
        serde_json::from_slice(bytes).ok()
    } else if is_form {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(bytes)
            .ok()
            .map(|pairs| {
                Value::Object(
                    pairs
                        .into_iter()
                        .map(|(k, v)| (k, Value::String(v)))
                        .collect::<Map<_, _>>(),
                )
            })
    } else {
        None
    };
    parsed.map(redact).unwrap_or(Value::Null)
}

/// Audit `<action>:attempt` before the handler and `<action>:success` or
/// `<action>:failed` after it. Mount with `from_fn_with_state(action, ..)`.
pub async fn log_sensitive_action(
    State(action): State<&'static str>,
    Extension(state): Extension<HttpState>,
    req: Request,
    next: Next,
) -> Response {
    let session = req.extensions().get::<SessionContext>().cloned();
    let actor = audit_actor(
        session.as_ref(),
        client_ip(req.headers(), req.extensions()),
    );
    let path = req.uri().path().to_string();

    let (parts, body) = req.into_parts();
    let bytes = match buffer_body(body).await {
        Ok(bytes) => bytes,
        Err(response) => return response,
    };
    let logged_body = parse_body(
        content_type_is(&parts.headers, "application/json"),
        is_form(&parts.headers),
        &bytes,
    );

    state
        .services
        .audit
        .log(
            &actor,
            format!("{action}:attempt"),
            json!({
                "path": path,
                "method": parts.method.as_str(),
                "body": logged_body,
            }),
        )
        .await;

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let status = response.status();
    let outcome = if status.is_success() { "success" } else { "failed" };
    state
        .services
        .audit
        .log(
            &actor,
            format!("{action}:{outcome}"),
            json!({ "statusCode": status.as_u16(), "path": path }),
        )
        .await;

    response
}

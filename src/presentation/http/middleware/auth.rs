// src/presentation/http/middleware/auth.rs
use crate::application::services::audit_logger::AuditActor;
use crate::presentation::http::{
    extractors::{SessionContext, audit_actor, client_ip, wants_json},
    state::HttpState,
};
use axum::{
    Extension,
    extract::{Path, Request},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use std::collections::HashMap;

use super::json_message;

fn deny(req: &Request, status: StatusCode, message: &str, redirect_to: &str) -> Response {
    if wants_json(req.headers()) {
        json_message(status, message)
    } else {
        Redirect::to(redirect_to).into_response()
    }
}

pub async fn require_authenticated(
    Extension(state): Extension<HttpState>,
    req: Request,
    next: Next,
) -> Response {
    if req.extensions().get::<SessionContext>().is_some() {
        return next.run(req).await;
    }

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    state
        .services
        .audit
        .log(
            &AuditActor::anonymous(client_ip(req.headers(), req.extensions())),
            "access:unauthorized",
            json!({
                "path": req.uri().path(),
                "method": req.method().as_str(),
                "userAgent": user_agent,
            }),
        )
        .await;

    deny(&req, StatusCode::UNAUTHORIZED, "Authentication required", "/auth/login")
}

pub async fn require_admin(
    Extension(state): Extension<HttpState>,
    req: Request,
    next: Next,
) -> Response {
    let session = req.extensions().get::<SessionContext>().cloned();
    let ip = client_ip(req.headers(), req.extensions());
    let path = req.uri().path().to_string();
    let actor = audit_actor(session.as_ref(), ip);

    match session {
        None => {
            state
                .services
                .audit
                .log(
                    &actor,
                    "admin:access_denied",
                    json!({ "path": path, "reason": "not_authenticated" }),
                )
                .await;
            deny(&req, StatusCode::UNAUTHORIZED, "Authentication required", "/auth/login")
        }
        Some(ctx) if !ctx.user().admin => {
            state
                .services
                .audit
                .log(
                    &actor,
                    "admin:access_denied",
                    json!({ "path": path, "reason": "insufficient_privileges" }),
                )
                .await;
            deny(&req, StatusCode::FORBIDDEN, "Administrator access required", "/")
        }
        Some(_) => {
            state
                .services
                .audit
                .log(&actor, "admin:access_granted", json!({ "path": path }))
                .await;
            next.run(req).await
        }
    }
}

/// For routes carrying a `{user_id}` segment: admins and the user themself
/// pass.
pub async fn require_admin_or_self(
    Extension(state): Extension<HttpState>,
    Path(params): Path<HashMap<String, String>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(ctx) = req.extensions().get::<SessionContext>().cloned() else {
        return json_message(StatusCode::UNAUTHORIZED, "Authentication required");
    };
    let target = params.get("user_id").cloned().unwrap_or_default();
    let path = req.uri().path().to_string();
    let actor = audit_actor(Some(&ctx), client_ip(req.headers(), req.extensions()));

    if ctx.user().admin {
        state
            .services
            .audit
            .log(
                &actor,
                "admin:resource_access",
                json!({ "targetUserId": target, "path": path }),
            )
            .await;
        return next.run(req).await;
    }

    if ctx.user().user_id == target {
        return next.run(req).await;
    }

    state
        .services
        .audit
        .log(
            &actor,
            "access:denied",
            json!({ "targetUserId": target, "path": path, "reason": "not_owner" }),
        )
        .await;
    json_message(StatusCode::FORBIDDEN, "Access denied")
}

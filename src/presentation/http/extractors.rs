// src/presentation/http/extractors.rs
use crate::{
    application::{
        dto::ApiKeyPrincipal,
        error::ApplicationError,
        ports::session::{Session, SessionUser},
        services::audit_logger::AuditActor,
    },
    presentation::http::state::HttpState,
};
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{Extensions, HeaderMap, header, request::Parts},
};
use headers::{Authorization, HeaderMapExt, authorization::Bearer};
use std::{convert::Infallible, net::SocketAddr};

use super::error::HttpError;

/// A live browser session, attached to the request by the session loader.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session: Session,
    pub csrf_token: String,
}

impl SessionContext {
    pub fn user(&self) -> &SessionUser {
        &self.session.user
    }
}

#[derive(Debug, Clone)]
pub struct CurrentUser(pub SessionContext);

#[derive(Debug, Clone)]
pub struct MaybeCurrentUser(pub Option<SessionContext>);

/// Caller authenticated with an API key bearer token.
#[derive(Debug, Clone)]
pub struct ApiKeyCaller(pub ApiKeyPrincipal);

/// Best-effort client address: first `X-Forwarded-For` hop, then the peer.
#[derive(Debug, Clone)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionContext>()
            .cloned()
            .map(Self)
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized("authentication required"))
            })
    }
}

impl<S> FromRequestParts<S> for MaybeCurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<SessionContext>().cloned()))
    }
}

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(client_ip(&parts.headers, &parts.extensions)))
    }
}

impl<S> FromRequestParts<S> for ApiKeyCaller
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let app_state = http_state(&parts.extensions)?;

        let header = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .ok_or_else(|| {
                HttpError::from_error(ApplicationError::unauthorized(
                    "missing Authorization header",
                ))
            })?;

        let ip = client_ip(&parts.headers, &parts.extensions);
        let principal = app_state
            .services
            .api_key_commands
            .authenticate(header.token(), &ip)
            .await
            .map_err(HttpError::from_error)?;

        Ok(Self(principal))
    }
}

pub fn http_state(extensions: &Extensions) -> Result<HttpState, HttpError> {
    extensions.get::<HttpState>().cloned().ok_or_else(|| {
        HttpError::from_error(ApplicationError::infrastructure(
            "application state missing",
        ))
    })
}

/// Client address recorded in audit entries. Forwarded headers count only
/// when the deployment declares a trusted proxy.
pub fn client_ip(headers: &HeaderMap, extensions: &Extensions) -> String {
    let trust_proxy = extensions
        .get::<HttpState>()
        .is_some_and(|state| state.settings.trust_proxy);
    resolve_client_ip(headers, extensions, trust_proxy)
}

pub fn resolve_client_ip(headers: &HeaderMap, extensions: &Extensions, trust_proxy: bool) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .filter(|_| trust_proxy)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return forwarded.to_string();
    }
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// AJAX callers and clients asking for JSON get JSON errors instead of
/// redirects.
pub fn wants_json(headers: &HeaderMap) -> bool {
    let xhr = headers
        .get("x-requested-with")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    let accepts_json = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    xhr || accepts_json
}

/// Audit actor for the current request.
pub fn audit_actor(session: Option<&SessionContext>, ip: impl Into<String>) -> AuditActor {
    match session {
        Some(ctx) => AuditActor::new(&ctx.user().user_id, &ctx.user().username, ip),
        None => AuditActor::anonymous(ip),
    }
}

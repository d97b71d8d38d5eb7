// src/presentation/http/controllers/auth.rs
use crate::application::{
    commands::users::LoginUserCommand, error::ApplicationError,
    services::audit_logger::AuditActor,
};
use crate::presentation::http::{
    controllers::render_page,
    error::{HttpError, HttpResult, IntoHttpResult},
    extractors::{ClientIp, MaybeCurrentUser, wants_json},
    middleware::session::{cleared_session_cookie, session_cookie_header},
    state::HttpState,
};
use axum::{
    Extension, Form, Json,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;

const AFTER_LOGIN: &str = "/instances";
const LOGIN_PAGE: &str = "/auth/login";
const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_page(
    Extension(state): Extension<HttpState>,
    MaybeCurrentUser(session): MaybeCurrentUser,
) -> HttpResult<Response> {
    if session.is_some() {
        return Ok(Redirect::to(AFTER_LOGIN).into_response());
    }
    let branding = state.services.panel_queries.branding().await.into_http()?;
    render_page(
        &state,
        "login",
        branding,
        json!({ "error": null, "csrf_token": "" }),
    )
    .map(IntoResponse::into_response)
}

pub async fn login(
    Extension(state): Extension<HttpState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> HttpResult<Response> {
    let command = LoginUserCommand {
        username: form.username,
        password: form.password,
        ip,
    };

    let session = match state.services.user_commands.login(command).await {
        Ok(session) => session,
        Err(ApplicationError::Unauthorized(_)) => {
            return login_failed(&state, &headers).await;
        }
        Err(err) => return Err(HttpError::from_error(err)),
    };

    let cookie = session_cookie_header(
        &session.id,
        state.settings.session_ttl.as_secs(),
        state.settings.secure_cookies(),
    );

    let response = if wants_json(&headers) {
        Json(json!({ "success": true, "redirect": AFTER_LOGIN })).into_response()
    } else {
        Redirect::to(AFTER_LOGIN).into_response()
    };
    Ok(([(header::SET_COOKIE, cookie)], response).into_response())
}

async fn login_failed(state: &HttpState, headers: &HeaderMap) -> HttpResult<Response> {
    if wants_json(headers) {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": INVALID_CREDENTIALS })),
        )
            .into_response());
    }
    let branding = state.services.panel_queries.branding().await.into_http()?;
    let page = render_page(
        state,
        "login",
        branding,
        json!({ "error": INVALID_CREDENTIALS, "csrf_token": "" }),
    )?;
    Ok((StatusCode::UNAUTHORIZED, page).into_response())
}

pub async fn logout(
    Extension(state): Extension<HttpState>,
    MaybeCurrentUser(session): MaybeCurrentUser,
    ClientIp(ip): ClientIp,
) -> HttpResult<Response> {
    if let Some(ctx) = session {
        state
            .services
            .user_commands
            .logout(&ctx.session.id)
            .await
            .into_http()?;
        state
            .services
            .audit
            .log(
                &AuditActor::new(&ctx.user().user_id, &ctx.user().username, ip),
                "logout",
                json!({}),
            )
            .await;
    }

    let cookie = cleared_session_cookie(state.settings.secure_cookies());
    Ok((
        [(header::SET_COOKIE, cookie)],
        Redirect::to(LOGIN_PAGE),
    )
        .into_response())
}

// src/presentation/http/controllers/panel.rs
use crate::presentation::http::{
    controllers::render_page,
    error::{HttpError, HttpResult, IntoHttpResult},
    extractors::{CurrentUser, MaybeCurrentUser},
    pages::PageConfig,
    state::HttpState,
};
use axum::{
    Extension,
    http::StatusCode,
    response::{Html, Redirect},
};
use serde_json::json;
use std::sync::Arc;

pub async fn root() -> Redirect {
    Redirect::to("/instances")
}

pub async fn instances(
    Extension(state): Extension<HttpState>,
    CurrentUser(ctx): CurrentUser,
) -> HttpResult<Html<String>> {
    let data = state
        .services
        .panel_queries
        .instances_page()
        .await
        .into_http()?;
    render_page(
        &state,
        "instances",
        data,
        json!({ "user": ctx.user(), "csrf_token": ctx.csrf_token }),
    )
}

/// Handler behind every route from the page configuration file.
pub async fn configured_page(
    Extension(state): Extension<HttpState>,
    Extension(page): Extension<Arc<PageConfig>>,
    MaybeCurrentUser(session): MaybeCurrentUser,
) -> HttpResult<Html<String>> {
    if !page.requires_auth {
        let branding = state.services.panel_queries.branding().await.into_http()?;
        let csrf_token = session.map(|ctx| ctx.csrf_token).unwrap_or_default();
        return render_page(
            &state,
            &page.template,
            branding,
            json!({ "csrf_token": csrf_token }),
        );
    }

    let ctx = session
        .ok_or_else(|| HttpError::new(StatusCode::UNAUTHORIZED, "authentication required"))?;
    let data = state
        .services
        .panel_queries
        .dashboard(&ctx.user().user_id)
        .await
        .into_http()?;
    render_page(
        &state,
        &page.template,
        data,
        json!({ "user": ctx.user(), "csrf_token": ctx.csrf_token }),
    )
}

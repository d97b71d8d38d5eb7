// src/presentation/http/controllers/mod.rs
pub mod admin;
pub mod api;
pub mod auth;
pub mod panel;
pub mod system;
pub mod users;

use crate::presentation::http::{
    error::{HttpError, HttpResult, IntoHttpResult},
    state::HttpState,
};
use axum::response::Html;
use serde::Serialize;
use serde_json::Value;

/// Render `template` with `data` merged with `extras` (extras win).
pub(crate) fn render_page(
    state: &HttpState,
    template: &str,
    data: impl Serialize,
    extras: Value,
) -> HttpResult<Html<String>> {
    let mut ctx = serde_json::to_value(data)
        .map_err(|err| HttpError::internal(format!("template context: {err}")))?;
    if let (Value::Object(ctx), Value::Object(extras)) = (&mut ctx, extras) {
        ctx.extend(extras);
    }
    state.views.render(template, ctx).into_http().map(Html)
}

// src/presentation/http/controllers/system.rs
use crate::presentation::http::openapi::{ApiDoc, StatusResponse};
use axum::{Json, http::header, response::IntoResponse};
use utoipa::OpenApi;

const CSRF_SCRIPT: &str = include_str!("../../../../assets/js/csrf-universal.js");

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check.", body = StatusResponse)
    ),
    tag = "System"
)]
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub async fn csrf_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        CSRF_SCRIPT,
    )
}

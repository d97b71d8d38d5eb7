// src/presentation/http/controllers/api.rs
use crate::domain::instance::Instance;
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::ApiKeyCaller,
    state::HttpState,
};
use axum::{Extension, Json};

#[utoipa::path(
    get,
    path = "/api/v1/instances",
    responses(
        (status = 200, description = "Instances visible to the key.", body = [Instance]),
        (status = 401, description = "Missing, unknown, disabled or expired API key.")
    ),
    security(("apiKey" = [])),
    tag = "API"
)]
pub async fn list_instances(
    Extension(state): Extension<HttpState>,
    ApiKeyCaller(caller): ApiKeyCaller,
) -> HttpResult<Json<Vec<Instance>>> {
    state
        .services
        .panel_queries
        .instances_for(caller.user_id.as_deref())
        .await
        .into_http()
        .map(Json)
}

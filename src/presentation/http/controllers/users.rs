// src/presentation/http/controllers/users.rs
use crate::application::dto::UserDto;
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    state::HttpState,
};
use axum::{Extension, Json, extract::Path};

#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User summary.", body = UserDto),
        (status = 401, description = "Not signed in."),
        (status = 403, description = "Neither an administrator nor the user."),
        (status = 404, description = "No such user.")
    ),
    tag = "Users"
)]
pub async fn get_user(
    Extension(state): Extension<HttpState>,
    Path(user_id): Path<String>,
) -> HttpResult<Json<UserDto>> {
    state
        .services
        .user_queries
        .get_user(&user_id)
        .await
        .into_http()
        .map(Json)
}

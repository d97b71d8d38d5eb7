// src/presentation/http/controllers/admin.rs
use crate::application::{
    commands::{api_keys::CreateApiKeyCommand, users::ChangePlanCommand},
    dto::{ApiKeySummary, CreatedApiKey, UserDto},
    error::ApplicationError,
    queries::audit::ListAuditLogsQuery,
};
use crate::domain::{
    api_key::{ApiKey, KEY_NAME_MAX_LEN},
    audit::AuditEntry,
    plan::PlanTier,
};
use crate::presentation::http::{
    error::{HttpResult, IntoHttpResult},
    extractors::{ClientIp, CurrentUser, audit_actor},
    middleware::validation::{Validate, ValidatedJson},
    state::HttpState,
};
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePlanRequest {
    /// One of `free`, `starter`, `intermediate`, `super`.
    pub plan: String,
}

impl Validate for ChangePlanRequest {
    fn validate(&self) -> Vec<String> {
        match self.plan.parse::<PlanTier>() {
            Ok(_) => Vec::new(),
            Err(err) => vec![err.to_string()],
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub name: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Validate for CreateApiKeyRequest {
    fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Err(err) = ApiKey::validate_name(&self.name) {
            errors.push(err.to_string());
        }
        if self.user_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            errors.push("userId cannot be blank".to_string());
        }
        errors
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuditLogParams {
    pub user_id: Option<String>,
    /// Substring of the action name.
    pub action: Option<String>,
    /// `info`, `warning` or `critical`.
    pub severity: Option<String>,
    /// RFC 3339 instant or `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// RFC 3339 instant or `YYYY-MM-DD` (whole day).
    pub end_date: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogsResponse {
    pub count: usize,
    pub logs: Vec<AuditEntry>,
}

#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "All panel users.", body = [UserDto]),
        (status = 401, description = "Not signed in."),
        (status = 403, description = "Not an administrator.")
    ),
    tag = "Admin"
)]
pub async fn list_users(Extension(state): Extension<HttpState>) -> HttpResult<Json<Vec<UserDto>>> {
    state
        .services
        .user_queries
        .list_users()
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    put,
    path = "/api/admin/users/{user_id}/plan",
    params(("user_id" = String, Path, description = "Target user id")),
    request_body = ChangePlanRequest,
    responses(
        (status = 200, description = "Plan changed.", body = UserDto),
        (status = 400, description = "Unknown plan."),
        (status = 404, description = "No such user."),
        (status = 409, description = "Current usage exceeds the target plan.")
    ),
    tag = "Admin"
)]
pub async fn change_plan(
    Extension(state): Extension<HttpState>,
    CurrentUser(ctx): CurrentUser,
    ClientIp(ip): ClientIp,
    Path(user_id): Path<String>,
    ValidatedJson(payload): ValidatedJson<ChangePlanRequest>,
) -> HttpResult<Json<UserDto>> {
    let plan = payload
        .plan
        .parse::<PlanTier>()
        .map_err(ApplicationError::from)
        .into_http()?;
    let actor = audit_actor(Some(&ctx), ip);
    state
        .services
        .user_commands
        .change_plan(&actor, ChangePlanCommand { user_id, plan })
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    get,
    path = "/api/admin/audit-logs",
    params(AuditLogParams),
    responses(
        (status = 200, description = "Matching audit entries, oldest first.", body = AuditLogsResponse),
        (status = 400, description = "Malformed filter.")
    ),
    tag = "Admin"
)]
pub async fn audit_logs(
    Extension(state): Extension<HttpState>,
    Query(params): Query<AuditLogParams>,
) -> HttpResult<Json<AuditLogsResponse>> {
    let query = ListAuditLogsQuery {
        user_id: params.user_id,
        action: params.action,
        severity: params.severity,
        start_date: params.start_date,
        end_date: params.end_date,
        limit: params.limit,
    };
    let logs = state
        .services
        .audit_queries
        .list_audit_logs(query)
        .await
        .into_http()?;
    Ok(Json(AuditLogsResponse {
        count: logs.len(),
        logs,
    }))
}

#[utoipa::path(
    get,
    path = "/api/admin/api-keys",
    responses((status = 200, description = "All API keys without secrets.", body = [ApiKeySummary])),
    tag = "Admin"
)]
pub async fn list_api_keys(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<Vec<ApiKeySummary>>> {
    state
        .services
        .api_key_queries
        .list_api_keys()
        .await
        .into_http()
        .map(Json)
}

#[utoipa::path(
    post,
    path = "/api/admin/api-keys",
    request_body = CreateApiKeyRequest,
    responses(
        (status = 201, description = "Key created. `plainKey` is shown only once.", body = CreatedApiKey),
        (status = 400, description = "Invalid name or expiry.")
    ),
    tag = "Admin"
)]
pub async fn create_api_key(
    Extension(state): Extension<HttpState>,
    CurrentUser(ctx): CurrentUser,
    ClientIp(ip): ClientIp,
    ValidatedJson(payload): ValidatedJson<CreateApiKeyRequest>,
) -> HttpResult<(StatusCode, Json<CreatedApiKey>)> {
    let actor = audit_actor(Some(&ctx), ip);
    let created = state
        .services
        .api_key_commands
        .create(
            &actor,
            CreateApiKeyCommand {
                name: payload.name,
                user_id: payload.user_id,
                expires_at: payload.expires_at,
            },
        )
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/api/admin/api-keys/{key_id}/disable",
    params(("key_id" = String, Path, description = "API key id")),
    responses(
        (status = 200, description = "Key disabled.", body = ApiKeySummary),
        (status = 404, description = "No such key.")
    ),
    tag = "Admin"
)]
pub async fn disable_api_key(
    Extension(state): Extension<HttpState>,
    CurrentUser(ctx): CurrentUser,
    ClientIp(ip): ClientIp,
    Path(key_id): Path<String>,
) -> HttpResult<Json<ApiKeySummary>> {
    let actor = audit_actor(Some(&ctx), ip);
    state
        .services
        .api_key_commands
        .disable(&actor, &key_id)
        .await
        .into_http()
        .map(Json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_request_validation() {
        assert!(ChangePlanRequest { plan: "Super".into() }.validate().is_empty());
        assert_eq!(ChangePlanRequest { plan: "gold".into() }.validate().len(), 1);
    }

    #[test]
    fn api_key_request_validation() {
        let ok = CreateApiKeyRequest {
            name: "ci".into(),
            user_id: None,
            expires_at: None,
        };
        assert!(ok.validate().is_empty());
        let bad = CreateApiKeyRequest {
            name: "x".repeat(KEY_NAME_MAX_LEN + 1),
            user_id: Some(" ".into()),
            expires_at: None,
        };
        assert_eq!(bad.validate().len(), 2);
    }
}

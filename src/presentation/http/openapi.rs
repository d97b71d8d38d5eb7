// src/presentation/http/openapi.rs
use crate::application::dto::{ApiKeySummary, CreatedApiKey, UserDto};
use crate::domain::{
    api_key::ApiKeyStatus,
    audit::{AuditEntry, Severity},
    instance::Instance,
    plan::{PlanLimits, PlanTier},
};
use crate::presentation::http::controllers::admin::{
    AuditLogsResponse, ChangePlanRequest, CreateApiKeyRequest,
};
use serde::{Deserialize, Serialize};
use utoipa::openapi::{
    Components,
    security::{ApiKey as ApiKeyScheme, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::controllers::system::health,
        crate::presentation::http::controllers::users::get_user,
        crate::presentation::http::controllers::admin::list_users,
        crate::presentation::http::controllers::admin::change_plan,
        crate::presentation::http::controllers::admin::audit_logs,
        crate::presentation::http::controllers::admin::list_api_keys,
        crate::presentation::http::controllers::admin::create_api_key,
        crate::presentation::http::controllers::admin::disable_api_key,
        crate::presentation::http::controllers::api::list_instances
    ),
    components(
        schemas(
            StatusResponse,
            AuditLogsResponse,
            ChangePlanRequest,
            CreateApiKeyRequest,
            UserDto,
            ApiKeySummary,
            CreatedApiKey,
            ApiKeyStatus,
            AuditEntry,
            Severity,
            Instance,
            PlanTier,
            PlanLimits
        )
    ),
    tags(
        (name = "Admin", description = "Administrator endpoints (session cookie)"),
        (name = "Users", description = "User endpoints (session cookie)"),
        (name = "API", description = "API key endpoints"),
        (name = "System", description = "System level endpoints")
    ),
    modifiers(&ApiDocCustomizer),
    security(("sessionCookie" = [])),
    info(
        title = "DracoPanel API",
        description = "Hosting panel administration API",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

struct ApiDocCustomizer;

impl Modify for ApiDocCustomizer {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        components.add_security_scheme(
            "sessionCookie",
            SecurityScheme::ApiKey(ApiKeyScheme::Cookie(ApiKeyValue::new(
                crate::presentation::http::state::SESSION_COOKIE,
            ))),
        );
        components.add_security_scheme("apiKey", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
    }
}

// src/presentation/http/middleware/validation.rs
use crate::presentation::http::{
    extractors::{SessionContext, audit_actor, client_ip, http_state},
};
use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Field-level checks run after a payload has been decoded.
pub trait Validate {
    /// Human-readable problems; empty when the payload is acceptable.
    fn validate(&self) -> Vec<String>;
}

/// JSON body that decoded and passed [`Validate`]. Failures are audited as
/// `validation:failed` and answered with 400.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

pub struct ValidationRejection {
    errors: Vec<String>,
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "message": "Invalid data",
                "errors": self.errors,
            })),
        )
            .into_response()
    }
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let session = req.extensions().get::<SessionContext>().cloned();
        let ip = client_ip(req.headers(), req.extensions());
        let path = req.uri().path().to_string();
        let app_state = http_state(req.extensions()).map_err(IntoResponse::into_response)?;

        let errors = match Json::<T>::from_request(req, state).await {
            Ok(Json(payload)) => {
                let errors = payload.validate();
                if errors.is_empty() {
                    return Ok(Self(payload));
                }
                errors
            }
            Err(rejection) => vec![rejection.body_text()],
        };

        app_state
            .services
            .audit
            .log(
                &audit_actor(session.as_ref(), ip),
                "validation:failed",
                json!({ "path": path, "errors": errors }),
            )
            .await;

        Err(ValidationRejection { errors }.into_response())
    }
}

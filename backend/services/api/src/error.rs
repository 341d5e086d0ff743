use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use qualis_common::error::QualisError;
use qualis_db::action_plans::validation::ValidationErrors;

pub struct ApiError(pub QualisError);

impl From<QualisError> for ApiError {
    fn from(err: QualisError) -> Self {
        Self(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self(errors.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            QualisError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            QualisError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            other => {
                tracing::error!(error = %other, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, Json(body)).into_response()
    }
}

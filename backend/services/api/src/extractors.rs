use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const USER_LOGIN_HEADER: &str = "X-User-Login";

/// Login of the user acting on the request.
pub struct UserLogin(pub String);

#[derive(Debug)]
pub struct UserLoginRejection(String);

impl IntoResponse for UserLoginRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.0 });
        (StatusCode::BAD_REQUEST, axum::Json(body)).into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for UserLogin {
    type Rejection = UserLoginRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(USER_LOGIN_HEADER)
            .ok_or_else(|| UserLoginRejection(format!("missing {USER_LOGIN_HEADER} header")))?;

        let value = header
            .to_str()
            .map_err(|_| UserLoginRejection(format!("invalid {USER_LOGIN_HEADER} header value")))?
            .trim();

        if value.is_empty() {
            return Err(UserLoginRejection(format!(
                "empty {USER_LOGIN_HEADER} header"
            )));
        }

        Ok(UserLogin(value.to_string()))
    }
}

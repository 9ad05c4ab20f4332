use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Every way an auth flow can fail, kept distinct so the HTTP edge can
/// map each kind to a status without inspecting messages.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email already registered")]
    DuplicateEmail,

    /// Deliberately covers both "no such user" and "wrong password" so
    /// callers cannot enumerate accounts from the error.
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("Invalid credential format")]
    MalformedCredential,

    #[error("Email not found in Google credential")]
    MissingEmail,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("authentication is not configured: {0}")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::DuplicateEmail
            | AuthError::MalformedCredential
            | AuthError::MissingEmail => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::Unauthenticated => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Configuration(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "detail": self.to_string() }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}

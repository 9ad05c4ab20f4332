use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::error::AuthError;

/// Pulls the raw token out of the `Authorization: Bearer` header.
/// Verification happens in `services::current_user`, together with the
/// user lookup.
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::Unauthenticated)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::Unauthenticated)?;

        Ok(BearerToken(token.to_string()))
    }
}

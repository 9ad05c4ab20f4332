use serde::{Deserialize, Serialize};

use crate::store::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

/// OAuth2 password form posted to `/token`; `username` carries the
/// email, per the password-grant convention.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Request body for `/auth/google`.
#[derive(Debug, Deserialize)]
pub struct GoogleAuthRequest {
    pub credential: String,
}

/// Public part of a user returned to the client.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_omits_the_password_hash() {
        let response = UserResponse {
            id: 1,
            email: "test@example.com".to_string(),
            full_name: Some("Test".to_string()),
            is_active: true,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("\"is_active\":true"));
        assert!(!json.contains("password"));
    }

    #[test]
    fn token_response_is_a_bearer_token() {
        let json = serde_json::to_string(&TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json, r#"{"access_token":"abc","token_type":"bearer"}"#);
    }
}

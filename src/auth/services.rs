use tracing::{debug, info, warn};

use crate::auth::error::AuthError;
use crate::auth::google;
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::store::{NewUser, User, UserStore};

/// Registers a new user with a locally hashed password.
pub async fn signup(
    store: &dyn UserStore,
    email: &str,
    password: &str,
    full_name: Option<String>,
) -> Result<User, AuthError> {
    if store.find_by_email(email).await?.is_some() {
        warn!(email = %email, "signup for already registered email");
        return Err(AuthError::DuplicateEmail);
    }

    let hashed = hash_password(password).map_err(AuthError::Internal)?;

    // The store's unique constraint catches the race where the same
    // email is registered between the lookup above and this insert.
    let user = store
        .insert(NewUser {
            email: email.to_string(),
            hashed_password: hashed,
            full_name,
            is_active: true,
        })
        .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok(user)
}

/// Exchanges an email/password pair for a bearer token. Unknown email
/// and wrong password fail identically.
pub async fn password_login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    email: &str,
    password: &str,
) -> Result<String, AuthError> {
    let user = match store.find_by_email(email).await? {
        Some(u) => u,
        None => {
            warn!(email = %email, "login for unknown email");
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !verify_password(password, &user.hashed_password) {
        warn!(email = %email, user_id = user.id, "login with invalid password");
        return Err(AuthError::InvalidCredentials);
    }

    let token = keys
        .sign(&user.email)
        .map_err(|e| AuthError::Configuration(e.to_string()))?;

    info!(user_id = user.id, email = %user.email, "user logged in");
    Ok(token)
}

/// Exchanges a Google ID token for a bearer token, creating the user
/// on first login. The credential's payload is trusted without
/// signature verification (see `google::decode_credential`).
pub async fn provider_login(
    store: &dyn UserStore,
    keys: &JwtKeys,
    credential: &str,
) -> Result<String, AuthError> {
    let claims = google::decode_credential(credential)?;
    // An empty email claim counts as absent; no account may exist for
    // the empty string.
    let email = claims
        .email
        .filter(|e| !e.is_empty())
        .ok_or(AuthError::MissingEmail)?;
    debug!(google_sub = ?claims.sub, "decoded google credential payload");
    warn!(email = %email, "accepting google credential without signature verification");

    let user = match store.find_by_email(&email).await? {
        Some(existing) => existing,
        None => {
            // An empty name falls back to the email local part, same
            // as a missing one.
            let full_name = claims
                .name
                .filter(|n| !n.is_empty())
                .or_else(|| email.split('@').next().map(str::to_string));
            let created = store
                .insert(NewUser {
                    email: email.clone(),
                    hashed_password: String::new(), // no local password
                    full_name,
                    is_active: true,
                })
                .await;
            match created {
                Ok(user) => {
                    info!(user_id = user.id, email = %user.email, "user created via google login");
                    user
                }
                // Concurrent first login for the same email; the other
                // request won the insert, so reuse its record.
                Err(AuthError::DuplicateEmail) => {
                    store.find_by_email(&email).await?.ok_or_else(|| {
                        AuthError::Internal(anyhow::anyhow!(
                            "user missing after duplicate-email insert"
                        ))
                    })?
                }
                Err(e) => return Err(e),
            }
        }
    };

    let token = keys
        .sign(&user.email)
        .map_err(|e| AuthError::Configuration(e.to_string()))?;

    info!(user_id = user.id, email = %user.email, "user logged in via google");
    Ok(token)
}

/// Resolves a bearer token back to its user. Verification failure and
/// a vanished user are both `Unauthenticated`.
pub async fn current_user(
    store: &dyn UserStore,
    keys: &JwtKeys,
    token: &str,
) -> Result<User, AuthError> {
    let claims = keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AuthError::Unauthenticated
    })?;

    store
        .find_by_email(&claims.sub)
        .await?
        .ok_or(AuthError::Unauthenticated)
}

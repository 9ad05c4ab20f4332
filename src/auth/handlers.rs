use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Form, Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{GoogleAuthRequest, LoginForm, SignupRequest, TokenResponse, UserResponse},
        error::AuthError,
        extractors::BearerToken,
        jwt::JwtKeys,
        services,
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/token", post(login))
        .route("/auth/google", post(google_auth))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/users/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<UserResponse>, AuthError> {
    let user = services::signup(
        state.store.as_ref(),
        &payload.email,
        &payload.password,
        payload.full_name,
    )
    .await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let token =
        services::password_login(state.store.as_ref(), &keys, &form.username, &form.password)
            .await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, payload))]
pub async fn google_auth(
    State(state): State<AppState>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let token =
        services::provider_login(state.store.as_ref(), &keys, &payload.credential).await?;
    Ok(Json(TokenResponse::bearer(token)))
}

#[instrument(skip(state, token))]
pub async fn get_me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<UserResponse>, AuthError> {
    let keys = JwtKeys::from_ref(&state);
    let user = services::current_user(state.store.as_ref(), &keys, &token).await?;
    Ok(Json(user.into()))
}

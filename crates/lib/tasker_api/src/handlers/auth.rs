//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{LoginRequest, RefreshRequest, SignupRequest, TokenResponse};
use crate::services::auth;

/// `POST /signup` — create a new user account.
pub async fn signup_handler(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(body) = body?;
    let pair = auth::signup(
        state.users.as_ref(),
        &state.config,
        &body.name,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(Json(pair.into()))
}

/// `POST /login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(body) = body?;
    let pair = auth::login(
        state.users.as_ref(),
        &state.config,
        &body.email,
        &body.password,
    )
    .await?;
    Ok(Json(pair.into()))
}

/// `POST /refresh` — exchange a refresh token for a new token pair.
pub async fn refresh_handler(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(body) = body?;
    let pair = auth::refresh(state.users.as_ref(), &state.config, &body.refresh_token).await?;
    Ok(Json(pair.into()))
}

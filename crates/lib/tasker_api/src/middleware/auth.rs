//! Authentication middleware — Bearer token extraction and access-token
//! verification.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tasker_core::auth::Identity;
use tasker_core::auth::jwt::authenticate_access_token;
use tracing::debug;

use crate::AppState;
use crate::error::AppError;

/// The caller resolved from the request's access token, stored in request
/// extensions for the lifetime of that request only.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub Identity);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies it as an
/// access token, and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization scheme".into()))?;

    let identity = authenticate_access_token(token, state.config.access_token_secret.as_bytes())
        .inspect_err(|e| debug!(error = %e, "access token rejected"))?;

    request.extensions_mut().insert(AuthenticatedUser(identity));

    Ok(next.run(request).await)
}

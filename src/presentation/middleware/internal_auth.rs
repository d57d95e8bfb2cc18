//! Internal API Authentication
//!
//! Guards the `/internal` routes used by the chat service to push events.
//! Requests must carry `Authorization: Bearer <internal.api_key>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::shared::error::AppError;
use crate::startup::AppState;

/// Middleware that checks the internal API key
pub async fn internal_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extract Authorization header
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".into()))?;

    // Check for Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".into()))?;

    let expected = state.settings.internal.api_key.as_bytes();
    if !bool::from(token.as_bytes().ct_eq(expected)) {
        return Err(AppError::Unauthorized("Invalid API key".into()));
    }

    Ok(next.run(request).await)
}

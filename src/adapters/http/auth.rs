//! Shared-secret authorization for the query routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::warn;

use super::error::ApiError;
use crate::services::AppContext;

/// Header carrying the caller's key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Compare two secrets without leaking where they differ.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// Reject requests whose `X-API-Key` does not match the configured secret.
pub async fn require_api_key(
    State(ctx): State<AppContext>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = ctx.config.auth.secret() else {
        warn!("Rejecting query: auth enabled but no server API key configured");
        return Err(ApiError::auth_not_configured());
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() || !keys_match(provided, expected) {
        warn!(path = %request.uri().path(), "Rejecting query: invalid API key");
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(request).await)
}

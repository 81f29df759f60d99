//! Handlers for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short identifier to its long URL.
///
/// # Endpoint
///
/// `GET /{short_id}`
///
/// # Request Flow
///
/// 1. Validate the identifier (reserved or malformed ids are not found)
/// 2. Check cache
/// 3. On cache miss or cache error, query the registry
/// 4. Asynchronously update cache
/// 5. Return 302 Found
///
/// # Errors
///
/// Returns 404 Not Found if the identifier is unknown, reserved or malformed.
/// Returns 500 if the registry fails or is not configured.
pub async fn redirect_handler(
    Path(short_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let long_url = state.resolver.resolve(&short_id).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, long_url)]).into_response())
}

/// Answers `GET /`, a redirect request without an identifier.
pub async fn missing_short_id_handler() -> AppError {
    AppError::missing_short_id()
}

//! Handler for link shortening endpoint.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL for a long URL, or returns the existing one.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "long_url": "example.com/path" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "shortUrl": "http://localhost:3000/aZ3kQ9x",
///   "shortId": "aZ3kQ9x",
///   "longUrl": "https://example.com/path"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is not valid JSON or the URL does not normalize
/// - 500 on registry failure, exhausted allocation, or missing registry configuration
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let shortened = state.shortener.shorten(&payload.long_url).await?;

    Ok(Json(shortened.into()))
}

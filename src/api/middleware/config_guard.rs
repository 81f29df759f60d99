//! Fail-fast guard for a missing registry configuration.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Rejects the request with `500 misconfigured` when the registry has no
/// connection settings.
///
/// The check happens before any handler runs, so no connection is attempted.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::post, middleware};
/// use crate::api::middleware::config_guard;
///
/// let guarded = Router::new()
///     .route("/api/shorten", post(shorten_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), config_guard::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(reason) = &st.misconfiguration {
        warn!(
            reason = %reason,
            path = %req.uri().path(),
            "Rejecting request: registry is not configured"
        );
        return Err(AppError::misconfigured());
    }

    Ok(next.run(req).await)
}

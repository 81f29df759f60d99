//! API route configuration.

use crate::api::handlers::{health_handler, shorten_handler};
use crate::api::middleware::config_guard;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// JSON API routes.
///
/// # Endpoints
///
/// - `POST /api/shorten` - Create (or return) a short URL; guarded by
///   [`config_guard`]
/// - `GET  /api/health`  - Registry and cache health; never guarded, so
///   operators can see a misconfiguration
///
/// Any other method on `/api/shorten` is answered with 405, or with the
/// guard's 500 while the registry is unconfigured.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/shorten", post(shorten_handler))
        .route_layer(middleware::from_fn_with_state(state, config_guard::layer))
        .route("/api/health", get(health_handler))
}

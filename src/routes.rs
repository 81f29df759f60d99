//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{short_id}`   - Redirect (guarded)
//! - `GET  /`             - 400, identifier missing
//! - `POST /api/shorten`  - Shorten (guarded)
//! - `GET  /api/health`   - Health check: registry and cache
//!
//! Reserved identifiers (`health`, `api`, ...) reach the redirect route and
//! are answered with 404 there.
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Config guard** - Fails fast when the registry is not configured
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{missing_short_id_handler, redirect_handler};
use crate::api::middleware::{config_guard, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the routed application without path normalization.
///
/// Used directly by HTTP tests; [`app_router`] wraps it for serving.
pub fn build_router(state: AppState) -> Router {
    let redirect = Router::new()
        .route("/{short_id}", get(redirect_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            config_guard::layer,
        ));

    Router::new()
        .route("/", get(missing_short_id_handler))
        .merge(redirect)
        .merge(api::routes::api_routes(state.clone()))
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}

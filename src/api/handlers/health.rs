//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /api/health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Registry**: Ping through the configured backend
/// 2. **Cache**: Backend ping (always ok when caching is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "registry": { "status": "ok", "message": "Registry reachable" },
///     "cache": { "status": "ok", "message": "redis connected" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let registry_check = check_registry(&state).await;

    let cache_check = check_cache(&state).await;

    let all_healthy = registry_check.is_ok() && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            registry: registry_check,
            cache: cache_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Pings the registry. Backend messages are not exposed.
async fn check_registry(state: &AppState) -> CheckStatus {
    if state.misconfiguration.is_some() {
        return CheckStatus::error("Registry not configured");
    }

    match state.registry.ping().await {
        Ok(()) => CheckStatus::ok("Registry reachable"),
        Err(e) => {
            tracing::warn!(error = %e, "Registry health check failed");
            CheckStatus::error("Registry unreachable")
        }
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    let backend = state.cache.backend_name();

    if state.cache.health_check().await {
        CheckStatus::ok(format!("{} connected", backend))
    } else {
        CheckStatus::error(format!("{} connection failed", backend))
    }
}

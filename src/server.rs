//! HTTP server initialization and runtime setup.
//!
//! Handles registry construction, cache setup, and the Axum server lifecycle.

use crate::application::services::ShortenerService;
use crate::config::{Config, RegistrySource};
use crate::domain::repositories::Registry;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    MemoryRegistry, PgRegistry, TimeoutRegistry, UnconfiguredRegistry,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connection attempts made before startup gives up on PostgreSQL.
const CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Registry backend (PostgreSQL with migrations, in-memory, or unconfigured)
/// - Redis cache (or NullCache fallback)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (registry, misconfiguration) = build_registry(&config).await?;
    let cache = build_cache(&config).await;

    let shortener = ShortenerService::new(
        Arc::clone(&registry),
        config.base_url.clone(),
        config.allocation_max_attempts,
    );

    let mut state = AppState::new(registry, cache, shortener, Some(config.cache_ttl_seconds));
    if let Some(reason) = misconfiguration {
        tracing::warn!(
            %reason,
            "Registry is not configured; shorten and redirect requests will fail"
        );
        state = state.with_misconfiguration(reason);
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Builds the registry selected by `config`.
///
/// Returns the misconfiguration reason alongside the registry when no
/// connection settings were found.
async fn build_registry(config: &Config) -> Result<(Arc<dyn Registry>, Option<String>)> {
    let timeout = Duration::from_millis(config.registry_timeout_ms);

    match &config.registry {
        RegistrySource::Postgres { database_url } => {
            let pool = connect_pool(config, database_url).await?;
            let registry = PgRegistry::new(Arc::new(pool));

            registry
                .migrate()
                .await
                .context("Failed to apply migrations")?;
            tracing::info!("Migrations applied");

            let registry: Arc<dyn Registry> = Arc::new(TimeoutRegistry::new(registry, timeout));
            Ok((registry, None))
        }
        RegistrySource::Memory => {
            tracing::warn!("Using in-memory registry; mappings are lost on restart");
            let registry: Arc<dyn Registry> =
                Arc::new(TimeoutRegistry::new(MemoryRegistry::new(), timeout));
            Ok((registry, None))
        }
        RegistrySource::Unconfigured { reason } => {
            let registry: Arc<dyn Registry> = Arc::new(UnconfiguredRegistry::new(reason.clone()));
            Ok((registry, Some(reason.clone())))
        }
    }
}

/// Opens the PostgreSQL pool, retrying with jittered exponential backoff.
///
/// # Errors
///
/// Returns the last connection error once every attempt has failed.
pub async fn connect_pool(config: &Config, database_url: &str) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Some(Duration::from_secs(config.db_idle_timeout)))
        .max_lifetime(Some(Duration::from_secs(config.db_max_lifetime)));

    // 200ms, 400ms, 800ms, ... capped at 5s
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS - 1);

    let pool = Retry::start(strategy, || {
        let options = options.clone();
        async move {
            options.connect(database_url).await.inspect_err(|e| {
                tracing::warn!(error = %e, "Failed to connect to PostgreSQL, retrying");
            })
        }
    })
    .await
    .context("Failed to connect to PostgreSQL")?;

    tracing::info!("Connected to database");

    Ok(pool)
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Cache disabled (NullCache)");
        return Arc::new(NullCache::new());
    };

    match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
        Ok(redis) => {
            tracing::info!("Cache enabled (Redis)");
            Arc::new(redis)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}

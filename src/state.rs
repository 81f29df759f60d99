//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{ResolverService, ShortenerService};
use crate::domain::repositories::Registry;
use crate::infrastructure::cache::CacheService;

/// Handles to the services, built once at startup.
///
/// The registry is constructed by the caller and injected; nothing in the
/// crate reaches for a process-wide client.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<dyn Registry>>,
    pub resolver: Arc<ResolverService<dyn Registry>>,
    pub registry: Arc<dyn Registry>,
    pub cache: Arc<dyn CacheService>,
    /// Set when the registry has no connection settings. Guarded routes
    /// answer `500 misconfigured` while this is present.
    pub misconfiguration: Option<Arc<str>>,
}

impl AppState {
    /// Builds the state around an already constructed registry.
    ///
    /// `shortener` must share `registry`; the resolver is derived from
    /// `registry` and `cache`.
    pub fn new(
        registry: Arc<dyn Registry>,
        cache: Arc<dyn CacheService>,
        shortener: ShortenerService<dyn Registry>,
        cache_ttl_seconds: Option<u64>,
    ) -> Self {
        let resolver = ResolverService::new(Arc::clone(&registry), Arc::clone(&cache), cache_ttl_seconds);

        Self {
            shortener: Arc::new(shortener),
            resolver: Arc::new(resolver),
            registry,
            cache,
            misconfiguration: None,
        }
    }

    /// Marks the registry as unconfigured.
    pub fn with_misconfiguration(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.misconfiguration = Some(reason.into());
        self
    }
}

//! Read path: validate an identifier and look up its target.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::{debug, error, warn};

use crate::domain::entities::{ShortId, ShortIdError};
use crate::domain::repositories::Registry;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

const NOT_FOUND_MESSAGE: &str = "Short URL not found.";

/// Resolves short identifiers to their long URLs.
///
/// Lookups go through the cache first. A cache error never fails a request;
/// it falls back to the registry. Registry hits are written back to the cache
/// in a background task.
pub struct ResolverService<R: Registry + ?Sized> {
    registry: Arc<R>,
    cache: Arc<dyn CacheService>,
    cache_ttl_seconds: Option<u64>,
}

impl<R: Registry + ?Sized> ResolverService<R> {
    pub fn new(
        registry: Arc<R>,
        cache: Arc<dyn CacheService>,
        cache_ttl_seconds: Option<u64>,
    ) -> Self {
        Self {
            registry,
            cache,
            cache_ttl_seconds,
        }
    }

    /// Returns the long URL stored for `raw_short_id`.
    ///
    /// Reserved tokens and strings outside the identifier space are answered
    /// as not found without consulting the registry.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the identifier is empty
    /// - [`AppError::NotFound`] if no usable mapping exists
    /// - [`AppError::Store`] / [`AppError::Misconfigured`] on registry failure
    pub async fn resolve(&self, raw_short_id: &str) -> Result<String, AppError> {
        let short_id = match ShortId::parse(raw_short_id) {
            Ok(short_id) => short_id,
            Err(ShortIdError::Missing) => {
                counter!("resolver_requests_total", "outcome" => "invalid").increment(1);
                return Err(AppError::missing_short_id());
            }
            Err(e) => {
                counter!("resolver_requests_total", "outcome" => "not_found").increment(1);
                debug!(short_id = raw_short_id, reason = %e, "Not an allocatable short ID");
                return Err(not_found());
            }
        };

        match self.cache.get_url(short_id.as_str()).await {
            Ok(Some(long_url)) if !long_url.trim().is_empty() => {
                counter!("resolver_requests_total", "outcome" => "cache_hit").increment(1);
                debug!(%short_id, "Cache HIT");
                return Ok(long_url);
            }
            Ok(_) => debug!(%short_id, "Cache MISS"),
            Err(e) => warn!(%short_id, error = %e, "Cache read failed, falling back to registry"),
        }

        let mapping = match self.registry.find_by_short_id(&short_id).await {
            Ok(Some(mapping)) if mapping.has_target() => mapping,
            Ok(_) => {
                counter!("resolver_requests_total", "outcome" => "not_found").increment(1);
                return Err(not_found());
            }
            Err(e) => {
                counter!("resolver_requests_total", "outcome" => "store_error").increment(1);
                error!(
                    operation = "find_by_short_id",
                    %short_id,
                    error = %e,
                    "Lookup failed"
                );
                return Err(AppError::from_registry(&e, "find_by_short_id"));
            }
        };

        counter!("resolver_requests_total", "outcome" => "resolved").increment(1);
        self.spawn_cache_write(short_id, mapping.long_url.clone());

        Ok(mapping.long_url)
    }

    fn spawn_cache_write(&self, short_id: ShortId, long_url: String) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.cache_ttl_seconds;

        tokio::spawn(async move {
            if let Err(e) = cache.set_url(short_id.as_str(), &long_url, ttl).await {
                warn!(%short_id, error = %e, "Failed to cache URL");
            }
        });
    }
}

fn not_found() -> AppError {
    AppError::not_found(NOT_FOUND_MESSAGE, json!({}))
}

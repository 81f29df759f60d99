//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for resolved short identifiers.
///
/// Mappings are immutable once created, so entries never need invalidation;
/// the TTL only bounds memory use. A cache failure must degrade to a registry
/// lookup, never to a failed request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the long URL for a short identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on cache miss
    async fn get_url(&self, short_id: &str) -> CacheResult<Option<String>>;

    /// Stores a resolved mapping.
    ///
    /// `ttl_seconds` falls back to the implementation default when `None`.
    async fn set_url(
        &self,
        short_id: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short label for health reporting.
    fn backend_name(&self) -> &'static str;
}

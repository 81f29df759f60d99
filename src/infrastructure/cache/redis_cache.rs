//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, error, info, warn};

/// Redis cache for resolved short identifiers.
///
/// Uses `ConnectionManager` for automatic reconnection. All operations are
/// fail-open: errors are logged and reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL used when [`CacheService::set_url`] gets `None`
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            key_prefix: "shortlink:url:".to_string(),
        })
    }

    fn build_key(&self, short_id: &str) -> String {
        format!("{}{}", self.key_prefix, short_id)
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_url(&self, short_id: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(short_id);
        let mut conn = self.client.clone();

        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(url)) => {
                debug!(short_id, "Cache HIT");
                Ok(Some(url))
            }
            Ok(None) => {
                debug!(short_id, "Cache MISS");
                Ok(None)
            }
            Err(e) => {
                error!(short_id, error = %e, "Redis GET failed");
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        short_id: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(short_id);
        let mut conn = self.client.clone();
        let ttl_seconds = ttl_seconds.unwrap_or(self.default_ttl);

        match conn.set_ex::<_, _, ()>(&key, long_url, ttl_seconds).await {
            Ok(_) => {
                debug!(short_id, ttl_seconds, "Cache SET");
                Ok(())
            }
            Err(e) => {
                warn!(short_id, error = %e, "Redis SET failed");
                Ok(())
            }
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

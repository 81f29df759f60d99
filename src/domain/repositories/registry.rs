//! Registry trait: the durable store of short identifier mappings.

use crate::domain::entities::{Mapping, NewMapping, ShortId};
use async_trait::async_trait;
use std::time::Duration;

/// Errors surfaced by registry backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The short identifier is already taken. The only retryable insert failure.
    #[error("short id '{0}' is already allocated")]
    UniquenessViolation(String),

    #[error("registry call timed out after {0:?}")]
    Timeout(Duration),

    #[error("registry is not configured: {0}")]
    Misconfigured(String),

    #[error("registry backend error: {0}")]
    Backend(String),
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Repository interface over short identifier mappings.
///
/// Implementations must enforce uniqueness of `short_id` atomically: two
/// concurrent inserts of the same identifier must not both succeed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRegistry`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryRegistry`] - in-process, for development and tests
/// - [`crate::infrastructure::persistence::TimeoutRegistry`] - bounds calls of another registry
/// - [`crate::infrastructure::persistence::UnconfiguredRegistry`] - rejects every call
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Registry: Send + Sync {
    /// Finds the mapping for a normalized long URL.
    ///
    /// When racing submissions stored more than one mapping for the same URL,
    /// the oldest one is returned.
    async fn find_by_long_url(&self, long_url: &str) -> RegistryResult<Option<Mapping>>;

    /// Finds the mapping for a short identifier.
    async fn find_by_short_id(&self, short_id: &ShortId) -> RegistryResult<Option<Mapping>>;

    /// Inserts a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UniquenessViolation`] if `short_id` already exists.
    async fn insert(&self, new_mapping: NewMapping) -> RegistryResult<Mapping>;

    /// Checks connectivity to the backing store.
    async fn ping(&self) -> RegistryResult<()>;
}

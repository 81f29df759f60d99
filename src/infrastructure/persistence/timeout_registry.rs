//! Registry decorator that bounds every call with a timeout.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::domain::entities::{Mapping, NewMapping, ShortId};
use crate::domain::repositories::{Registry, RegistryError, RegistryResult};

/// Wraps another registry and fails any call that outlives `timeout` with
/// [`RegistryError::Timeout`].
///
/// A timed-out insert may still have been applied by the backend. The caller
/// treats it as a store error; it is never retried with the same candidate.
pub struct TimeoutRegistry<R> {
    inner: R,
    timeout: Duration,
}

impl<R: Registry> TimeoutRegistry<R> {
    pub fn new(inner: R, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = RegistryResult<T>> + Send,
    ) -> RegistryResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Registry call timed out"
                );
                Err(RegistryError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait]
impl<R: Registry> Registry for TimeoutRegistry<R> {
    async fn find_by_long_url(&self, long_url: &str) -> RegistryResult<Option<Mapping>> {
        self.bounded("find_by_long_url", self.inner.find_by_long_url(long_url))
            .await
    }

    async fn find_by_short_id(&self, short_id: &ShortId) -> RegistryResult<Option<Mapping>> {
        self.bounded("find_by_short_id", self.inner.find_by_short_id(short_id))
            .await
    }

    async fn insert(&self, new_mapping: NewMapping) -> RegistryResult<Mapping> {
        self.bounded("insert", self.inner.insert(new_mapping)).await
    }

    async fn ping(&self) -> RegistryResult<()> {
        self.bounded("ping", self.inner.ping()).await
    }
}

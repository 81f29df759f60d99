//! Registry stand-in used when connection settings are missing.

use async_trait::async_trait;

use crate::domain::entities::{Mapping, NewMapping, ShortId};
use crate::domain::repositories::{Registry, RegistryError, RegistryResult};

/// Answers every call with [`RegistryError::Misconfigured`] without touching
/// the network.
pub struct UnconfiguredRegistry {
    reason: String,
}

impl UnconfiguredRegistry {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn fail<T>(&self) -> RegistryResult<T> {
        Err(RegistryError::Misconfigured(self.reason.clone()))
    }
}

#[async_trait]
impl Registry for UnconfiguredRegistry {
    async fn find_by_long_url(&self, _long_url: &str) -> RegistryResult<Option<Mapping>> {
        self.fail()
    }

    async fn find_by_short_id(&self, _short_id: &ShortId) -> RegistryResult<Option<Mapping>> {
        self.fail()
    }

    async fn insert(&self, _new_mapping: NewMapping) -> RegistryResult<Mapping> {
        self.fail()
    }

    async fn ping(&self) -> RegistryResult<()> {
        self.fail()
    }
}

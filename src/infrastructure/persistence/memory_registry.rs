//! In-memory implementation of the registry.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::domain::entities::{Mapping, NewMapping, ShortId};
use crate::domain::repositories::{Registry, RegistryError, RegistryResult};

/// In-process registry using `DashMap`.
///
/// Inserting goes through the entry API, so check-and-insert on a short id is
/// atomic under the shard lock. The long URL index keeps the first writer.
/// Contents are lost on restart; intended for development and tests.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    by_short_id: DashMap<String, Mapping>,
    by_long_url: DashMap<String, ShortId>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_short_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_short_id.is_empty()
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn find_by_long_url(&self, long_url: &str) -> RegistryResult<Option<Mapping>> {
        let Some(short_id) = self.by_long_url.get(long_url).map(|r| r.value().clone()) else {
            return Ok(None);
        };

        Ok(self
            .by_short_id
            .get(short_id.as_str())
            .map(|r| r.value().clone()))
    }

    async fn find_by_short_id(&self, short_id: &ShortId) -> RegistryResult<Option<Mapping>> {
        Ok(self
            .by_short_id
            .get(short_id.as_str())
            .map(|r| r.value().clone()))
    }

    async fn insert(&self, new_mapping: NewMapping) -> RegistryResult<Mapping> {
        let NewMapping { short_id, long_url } = new_mapping;

        match self.by_short_id.entry(short_id.as_str().to_owned()) {
            Entry::Occupied(_) => Err(RegistryError::UniquenessViolation(short_id.into_inner())),
            Entry::Vacant(slot) => {
                let mapping = Mapping::new(short_id.clone(), long_url.clone(), Utc::now());
                slot.insert(mapping.clone());
                self.by_long_url.entry(long_url).or_insert(short_id);
                Ok(mapping)
            }
        }
    }

    async fn ping(&self) -> RegistryResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn id(s: &str) -> ShortId {
        ShortId::parse(s).unwrap()
    }

    fn new_mapping(short_id: &str, long_url: &str) -> NewMapping {
        NewMapping {
            short_id: id(short_id),
            long_url: long_url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_by_short_id() {
        let registry = MemoryRegistry::new();

        let created = registry
            .insert(new_mapping("abc1234", "https://example.com/"))
            .await
            .unwrap();
        assert_eq!(created.short_id, id("abc1234"));

        let found = registry.find_by_short_id(&id("abc1234")).await.unwrap();
        assert_eq!(found.unwrap().long_url, "https://example.com/");
    }

    #[tokio::test]
    async fn test_find_missing() {
        let registry = MemoryRegistry::new();

        assert!(registry.find_by_short_id(&id("zzzzzzz")).await.unwrap().is_none());
        assert!(
            registry
                .find_by_long_url("https://example.com/")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_insert_duplicate_short_id_is_rejected() {
        let registry = MemoryRegistry::new();

        registry
            .insert(new_mapping("abc1234", "https://first.com/"))
            .await
            .unwrap();

        let err = registry
            .insert(new_mapping("abc1234", "https://second.com/"))
            .await
            .unwrap_err();
        assert_eq!(err, RegistryError::UniquenessViolation("abc1234".into()));

        // the original record is untouched
        let found = registry.find_by_short_id(&id("abc1234")).await.unwrap();
        assert_eq!(found.unwrap().long_url, "https://first.com/");
    }

    #[tokio::test]
    async fn test_long_url_index_keeps_first_writer() {
        let registry = MemoryRegistry::new();

        registry
            .insert(new_mapping("first01", "https://example.com/"))
            .await
            .unwrap();
        registry
            .insert(new_mapping("second2", "https://example.com/"))
            .await
            .unwrap();

        let found = registry
            .find_by_long_url("https://example.com/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.short_id, id("first01"));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_of_same_id_only_one_wins() {
        let registry = Arc::new(MemoryRegistry::new());
        let mut handles = vec![];

        for i in 0..16 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                registry
                    .insert(new_mapping("samesam", &format!("https://example{i}.com/")))
                    .await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(matches!(e, RegistryError::UniquenessViolation(_))),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(MemoryRegistry::new().ping().await.is_ok());
    }
}

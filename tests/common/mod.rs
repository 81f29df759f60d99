#![allow(dead_code)]

use axum_test::TestServer;
use shortlink::application::services::{DEFAULT_MAX_ATTEMPTS, ShortenerService};
use shortlink::domain::entities::ShortId;
use shortlink::domain::repositories::Registry;
use shortlink::infrastructure::cache::NullCache;
use shortlink::infrastructure::persistence::{MemoryRegistry, UnconfiguredRegistry};
use shortlink::routes::build_router;
use shortlink::state::AppState;
use shortlink::utils::code_generator::IdGenerator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BASE_URL: &str = "http://s.test";

/// State over an in-memory registry with the random generator.
pub fn create_test_state(registry: Arc<dyn Registry>) -> AppState {
    let shortener = ShortenerService::new(Arc::clone(&registry), BASE_URL, DEFAULT_MAX_ATTEMPTS);
    AppState::new(registry, Arc::new(NullCache::new()), shortener, None)
}

/// State whose shortener draws identifiers from `generator`.
pub fn create_state_with_generator(
    registry: Arc<dyn Registry>,
    generator: Arc<dyn IdGenerator>,
) -> AppState {
    let shortener = ShortenerService::with_generator(
        Arc::clone(&registry),
        generator,
        BASE_URL,
        DEFAULT_MAX_ATTEMPTS,
    );
    AppState::new(registry, Arc::new(NullCache::new()), shortener, None)
}

/// State as built when no registry settings exist.
pub fn create_misconfigured_state() -> AppState {
    let reason = "DATABASE_URL or DB_USER must be set for the PostgreSQL registry";
    let registry: Arc<dyn Registry> = Arc::new(UnconfiguredRegistry::new(reason));
    create_test_state(registry).with_misconfiguration(reason)
}

pub fn memory_registry() -> Arc<MemoryRegistry> {
    Arc::new(MemoryRegistry::new())
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state)).unwrap()
}

/// Generator that replays `ids` in order and then repeats the last one.
pub struct ScriptedGenerator {
    ids: Vec<ShortId>,
    next: AtomicUsize,
}

impl ScriptedGenerator {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(|id| ShortId::parse(id).unwrap()).collect(),
            next: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl IdGenerator for ScriptedGenerator {
    fn generate(&self) -> ShortId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        self.ids[n.min(self.ids.len() - 1)].clone()
    }
}

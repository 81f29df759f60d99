//! Registry implementations.
//!
//! - [`PgRegistry`] - PostgreSQL storage via SQLx
//! - [`MemoryRegistry`] - In-process storage for development and tests
//! - [`TimeoutRegistry`] - Bounds every call of a wrapped registry
//! - [`UnconfiguredRegistry`] - Fails every call when settings are missing

pub mod memory_registry;
pub mod pg_registry;
pub mod timeout_registry;
pub mod unconfigured_registry;

pub use memory_registry::MemoryRegistry;
pub use pg_registry::PgRegistry;
pub use timeout_registry::TimeoutRegistry;
pub use unconfigured_registry::UnconfiguredRegistry;

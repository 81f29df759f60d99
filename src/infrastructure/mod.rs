//! Infrastructure layer for external integrations.
//!
//! Implements interfaces defined by the domain layer.
//!
//! - [`cache`] - Read-through cache (Redis and no-op implementations)
//! - [`persistence`] - Registry backends

pub mod cache;
pub mod persistence;

//! Repository trait definitions for the domain layer.
//!
//! The [`Registry`] trait abstracts the mapping store. Concrete backends live in
//! `crate::infrastructure::persistence`; a `mockall` mock is generated for unit tests.

pub mod registry;

pub use registry::{Registry, RegistryError, RegistryResult};

#[cfg(test)]
pub use registry::MockRegistry;

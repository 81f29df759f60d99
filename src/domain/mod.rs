//! Domain layer containing business entities and the registry contract.
//!
//! - [`entities`] - Mapping record and the short identifier type
//! - [`repositories`] - The [`repositories::Registry`] trait and its error type
//!
//! The domain layer has no dependencies on infrastructure or presentation layers.

pub mod entities;
pub mod repositories;

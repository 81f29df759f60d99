//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::Registry`] trait and
//! expose the two operations HTTP handlers and the admin CLI call into.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - URL normalization, deduplication and identifier allocation
//! - [`services::resolver_service::ResolverService`] - Identifier validation and cached lookup

pub mod services;

//! HTTP middleware for request processing.
//!
//! Provides the configuration guard and observability middleware.

pub mod config_guard;
pub mod tracing;

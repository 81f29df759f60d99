//! Utility functions for identifier generation, URL processing, and retries.
//!
//! - [`code_generator`] - Short identifier generation
//! - [`url_normalizer`] - URL normalization and sanitization
//! - [`retry`] - Bounded retry combinator used by identifier allocation
//! - [`db_error`] - Database error classification

pub mod code_generator;
pub mod db_error;
pub mod retry;
pub mod url_normalizer;

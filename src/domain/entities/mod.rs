//! Core domain entities.
//!
//! - [`Mapping`] - A stored short identifier -> long URL record
//! - [`NewMapping`] - Input for inserting a mapping
//! - [`ShortId`] - A validated member of the identifier space

pub mod mapping;
pub mod short_id;

pub use mapping::{Mapping, NewMapping};
pub use short_id::{ALPHABET, RESERVED_IDS, SHORT_ID_LENGTH, ShortId, ShortIdError};

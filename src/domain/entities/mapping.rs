//! Mapping entity: one short identifier pointing at one long URL.

use chrono::{DateTime, Utc};

use super::short_id::ShortId;

/// A stored short-identifier-to-long-URL record.
///
/// Mappings are created once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub short_id: ShortId,
    pub long_url: String,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(short_id: ShortId, long_url: String, created_at: DateTime<Utc>) -> Self {
        Self {
            short_id,
            long_url,
            created_at,
        }
    }

    /// Returns true if the record carries a usable redirect target.
    pub fn has_target(&self) -> bool {
        !self.long_url.trim().is_empty()
    }
}

/// Input data for inserting a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub short_id: ShortId,
    pub long_url: String,
}

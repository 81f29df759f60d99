//! Short identifier value type.
//!
//! A [`ShortId`] is always exactly [`SHORT_ID_LENGTH`] characters drawn from
//! [`ALPHABET`] and is never one of [`RESERVED_IDS`]. Construction goes through
//! [`ShortId::parse`] or the generator in [`crate::utils::code_generator`], so any
//! value of this type is a member of the allocatable identifier space.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of characters in every short identifier.
pub const SHORT_ID_LENGTH: usize = 7;

/// The 62 symbols short identifiers are drawn from: lowercase, uppercase, digits.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Tokens that collide with system routes.
///
/// They are never allocated and never resolved; a lookup for one of them is
/// answered exactly like a lookup for an identifier that does not exist.
pub const RESERVED_IDS: &[&str] = &["health", "_health", "shorten", "api"];

/// Reasons a raw path segment is not a valid short identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShortIdError {
    #[error("Short ID is missing")]
    Missing,

    #[error("Short ID is reserved")]
    Reserved,

    #[error("Short ID must be {SHORT_ID_LENGTH} characters, got {0}")]
    InvalidLength(usize),

    #[error("Short ID contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A validated short identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortId(String);

impl ShortId {
    /// Parses a raw identifier.
    ///
    /// The reserved check runs before the shape check, so reserved tokens are
    /// reported as [`ShortIdError::Reserved`] even when they would also fail
    /// the length or alphabet rules.
    ///
    /// # Errors
    ///
    /// - [`ShortIdError::Missing`] for empty or whitespace-only input
    /// - [`ShortIdError::Reserved`] for any member of [`RESERVED_IDS`]
    /// - [`ShortIdError::InvalidLength`] / [`ShortIdError::InvalidCharacter`]
    ///   for anything outside the identifier space
    pub fn parse(raw: &str) -> Result<Self, ShortIdError> {
        if raw.trim().is_empty() {
            return Err(ShortIdError::Missing);
        }

        if is_reserved(raw) {
            return Err(ShortIdError::Reserved);
        }

        if let Some(c) = raw.chars().find(|c| !is_alphabet_char(*c)) {
            return Err(ShortIdError::InvalidCharacter(c));
        }

        if raw.len() != SHORT_ID_LENGTH {
            return Err(ShortIdError::InvalidLength(raw.len()));
        }

        Ok(Self(raw.to_owned()))
    }

    /// Wraps an identifier read back from the registry.
    ///
    /// Stored rows are authoritative, so no validation happens here.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Returns true if `raw` is one of the reserved system tokens.
pub fn is_reserved(raw: &str) -> bool {
    RESERVED_IDS.contains(&raw)
}

fn is_alphabet_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ShortId {
    type Err = ShortIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

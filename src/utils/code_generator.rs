//! Short identifier generation.
//!
//! Identifiers are uniform random draws from the 62-symbol alphabet. The
//! generator never consults the registry; uniqueness is enforced at insert time
//! by the shortener's allocation loop.

use rand::Rng;

use crate::domain::entities::short_id::{ALPHABET, SHORT_ID_LENGTH, ShortId, is_reserved};

/// Source of candidate short identifiers.
///
/// The shortener takes this as a trait object so tests can script collisions.
#[cfg_attr(test, mockall::automock)]
pub trait IdGenerator: Send + Sync {
    /// Draws one candidate identifier.
    fn generate(&self) -> ShortId;
}

/// Production generator backed by the thread-local CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> ShortId {
        generate_code()
    }
}

/// Generates a random short identifier.
///
/// Each of the [`SHORT_ID_LENGTH`] characters is drawn independently and
/// uniformly from [`ALPHABET`] using `rand::rng()`, which is a CSPRNG seeded
/// from the operating system.
///
/// # Examples
///
/// ```
/// use shortlink::utils::code_generator::generate_code;
///
/// let code = generate_code();
/// assert_eq!(code.as_str().len(), 7);
/// assert!(code.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> ShortId {
    let mut rng = rand::rng();

    loop {
        let code: String = (0..SHORT_ID_LENGTH)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();

        // Only reachable if a reserved token ever has identifier length.
        if !is_reserved(&code) {
            return ShortId::from_stored(code);
        }
    }
}

//! Write path: normalize, deduplicate, allocate.

use std::sync::Arc;

use metrics::counter;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Mapping, NewMapping, ShortId};
use crate::domain::repositories::{Registry, RegistryError};
use crate::error::AppError;
use crate::utils::code_generator::{IdGenerator, RandomIdGenerator};
use crate::utils::retry::{Attempt, RetryOutcome, retry};
use crate::utils::url_normalizer::normalize_url;

/// Default number of candidates drawn before allocation gives up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Result of a successful shorten call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedUrl {
    pub short_id: ShortId,
    pub short_url: String,
    /// Canonical form of the submitted URL.
    pub long_url: String,
    /// False when an existing mapping was returned.
    pub created: bool,
}

/// Service that turns long URLs into short identifiers.
///
/// Steps run strictly in order: normalize, look up an existing mapping, and
/// only if none exists allocate a fresh identifier. The lookup and the insert
/// are separate registry calls; concurrent submissions of the same URL can
/// both allocate, and later lookups converge on the oldest mapping.
pub struct ShortenerService<R: Registry + ?Sized> {
    registry: Arc<R>,
    generator: Arc<dyn IdGenerator>,
    base_url: String,
    max_attempts: u32,
}

impl<R: Registry + ?Sized> ShortenerService<R> {
    /// Creates a shortener using the random identifier generator.
    ///
    /// `base_url` is the public origin short URLs are built on; a trailing
    /// slash is ignored.
    pub fn new(registry: Arc<R>, base_url: impl Into<String>, max_attempts: u32) -> Self {
        Self::with_generator(registry, Arc::new(RandomIdGenerator), base_url, max_attempts)
    }

    /// Creates a shortener with a custom identifier source.
    pub fn with_generator(
        registry: Arc<R>,
        generator: Arc<dyn IdGenerator>,
        base_url: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            registry,
            generator,
            base_url,
            max_attempts,
        }
    }

    /// Shortens a long URL.
    ///
    /// Submitting a URL whose canonical form is already stored returns the
    /// existing identifier and creates nothing.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL does not normalize
    /// - [`AppError::Store`] if the registry fails or times out, including on
    ///   the duplicate lookup (allocation is never attempted after a failed lookup)
    /// - [`AppError::AllocationExhausted`] if every candidate collided
    /// - [`AppError::Misconfigured`] if the registry has no connection settings
    pub async fn shorten(&self, raw_long_url: &str) -> Result<ShortenedUrl, AppError> {
        let long_url = normalize_url(raw_long_url).map_err(|e| {
            counter!("shortener_requests_total", "outcome" => "invalid").increment(1);
            debug!(error = %e, "Rejected long URL");
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        match self.registry.find_by_long_url(&long_url).await {
            Ok(Some(existing)) => {
                counter!("shortener_requests_total", "outcome" => "existing").increment(1);
                debug!(short_id = %existing.short_id, long_url, "Returning existing mapping");
                return Ok(self.shortened(existing, false));
            }
            Ok(None) => {}
            Err(e) => {
                counter!("shortener_requests_total", "outcome" => "store_error").increment(1);
                error!(
                    operation = "find_by_long_url",
                    long_url,
                    error = %e,
                    "Duplicate lookup failed"
                );
                return Err(AppError::from_registry(&e, "find_by_long_url"));
            }
        }

        let mapping = self.allocate(&long_url).await?;

        counter!("shortener_requests_total", "outcome" => "created").increment(1);
        info!(short_id = %mapping.short_id, long_url, "Created short URL");

        Ok(self.shortened(mapping, true))
    }

    /// Builds the public short URL for an identifier.
    pub fn short_url(&self, short_id: &ShortId) -> String {
        format!("{}/{}", self.base_url, short_id)
    }

    /// Inserts `long_url` under fresh candidates until one is accepted.
    async fn allocate(&self, long_url: &str) -> Result<Mapping, AppError> {
        let outcome = retry(self.max_attempts, |attempt| {
            let candidate = self.generator.generate();
            let new_mapping = NewMapping {
                short_id: candidate,
                long_url: long_url.to_owned(),
            };

            async move {
                match self.registry.insert(new_mapping).await {
                    Ok(mapping) => Attempt::Done(mapping),
                    Err(RegistryError::UniquenessViolation(short_id)) => {
                        counter!("shortener_id_collisions_total").increment(1);
                        warn!(short_id, attempt, "Short ID collision, drawing a new candidate");
                        Attempt::Retry
                    }
                    Err(e) => Attempt::Abort(e),
                }
            }
        })
        .await;

        match outcome {
            RetryOutcome::Success(mapping) => Ok(mapping),
            RetryOutcome::Exhausted { attempts } => {
                counter!("shortener_requests_total", "outcome" => "exhausted").increment(1);
                error!(long_url, attempts, "Short ID allocation exhausted");
                Err(AppError::allocation_exhausted(attempts))
            }
            RetryOutcome::Aborted(e) => {
                counter!("shortener_requests_total", "outcome" => "store_error").increment(1);
                error!(operation = "insert", long_url, error = %e, "Insert failed");
                Err(AppError::from_registry(&e, "insert"))
            }
        }
    }

    fn shortened(&self, mapping: Mapping, created: bool) -> ShortenedUrl {
        ShortenedUrl {
            short_url: self.short_url(&mapping.short_id),
            short_id: mapping.short_id,
            long_url: mapping.long_url,
            created,
        }
    }
}

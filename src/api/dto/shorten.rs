//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::ShortenedUrl;
use crate::domain::entities::ShortId;

/// Request to shorten a single URL.
///
/// Accepts `long_url` as well as the `longUrl` and `url` spellings. A missing
/// field deserializes to an empty string and is rejected by normalization.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default, alias = "longUrl", alias = "url")]
    #[validate(length(max = 8192, message = "URL is too long"))]
    pub long_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_id: ShortId,
    /// Normalized form of the submitted URL.
    pub long_url: String,
}

impl From<ShortenedUrl> for ShortenResponse {
    fn from(shortened: ShortenedUrl) -> Self {
        Self {
            short_url: shortened.short_url,
            short_id: shortened.short_id,
            long_url: shortened.long_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_aliases() {
        for body in [
            r#"{"long_url":"example.com"}"#,
            r#"{"longUrl":"example.com"}"#,
            r#"{"url":"example.com"}"#,
        ] {
            let request: ShortenRequest = serde_json::from_str(body).unwrap();
            assert_eq!(request.long_url, "example.com");
        }
    }

    #[test]
    fn test_request_missing_field_is_empty() {
        let request: ShortenRequest = serde_json::from_str("{}").unwrap();
        assert!(request.long_url.is_empty());
    }

    #[test]
    fn test_request_rejects_oversized_url() {
        let request = ShortenRequest {
            long_url: format!("https://example.com/{}", "a".repeat(9000)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_response_is_camel_case() {
        let response = ShortenResponse {
            short_url: "http://localhost:3000/abc1234".into(),
            short_id: ShortId::parse("abc1234").unwrap(),
            long_url: "https://example.com/".into(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["shortUrl"], "http://localhost:3000/abc1234");
        assert_eq!(json["shortId"], "abc1234");
        assert_eq!(json["longUrl"], "https://example.com/");
    }
}

//! URL normalization and sanitization utilities.
//!
//! Produces the canonical form used both for storage and for duplicate
//! detection, and closes the door on non-HTTP(S) schemes.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Matches a leading `scheme:` as defined by RFC 3986.
static SCHEME_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").unwrap());

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,

    #[error("Failed to normalize URL: {0}")]
    NormalizationFailed(String),
}

/// Normalizes a URL to a canonical form.
///
/// # Normalization Rules
///
/// 1. **Whitespace**: Leading and trailing whitespace is trimmed
/// 2. **Bare domains**: Input without a scheme gets `https://` prepended
/// 3. **Protocol**: Only HTTP and HTTPS are allowed
/// 4. **Host**: Required and lowercased
/// 5. **Default ports**: Removed (80 for HTTP, 443 for HTTPS)
/// 6. **Path, query, fragment**: Preserved
///
/// A `host:port` prefix such as `localhost:3000` is treated as a bare domain,
/// not as a scheme.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input,
/// [`UrlNormalizationError::UnsupportedProtocol`] for any scheme other than
/// `http`/`https`, [`UrlNormalizationError::InvalidFormat`] for unparsable input
/// and [`UrlNormalizationError::MissingHost`] when no host is present.
///
/// # Examples
///
/// ```
/// use shortlink::utils::url_normalizer::normalize_url;
///
/// assert_eq!(normalize_url("example.com").unwrap(), "https://example.com/");
/// assert_eq!(
///     normalize_url("HTTPS://EXAMPLE.COM:443/Path").unwrap(),
///     "https://example.com/Path"
/// );
/// assert!(normalize_url("javascript:alert(1)").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let candidate = match explicit_scheme(trimmed) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") => {
            trimmed.to_owned()
        }
        Some(_) => return Err(UrlNormalizationError::UnsupportedProtocol),
        None => format!("https://{trimmed}"),
    };

    let mut url =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_ascii_lowercase(),
        _ => return Err(UrlNormalizationError::MissingHost),
    };

    url.set_host(Some(&host)).map_err(|_| {
        UrlNormalizationError::NormalizationFailed("Failed to set normalized host".to_string())
    })?;

    let is_default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if is_default_port {
        url.set_port(None).map_err(|_| {
            UrlNormalizationError::NormalizationFailed("Failed to remove default port".to_string())
        })?;
    }

    Ok(url.to_string())
}

/// Returns the scheme of `input` if it carries one.
///
/// `example.com:8080/path` parses as scheme `example.com` under RFC 3986. The
/// prefix is read as `host:port` instead when it looks like a host name and the
/// digits run up to `/`, `?`, `#` or the end of input.
fn explicit_scheme(input: &str) -> Option<&str> {
    let captures = SCHEME_PREFIX.captures(input)?;
    let whole = captures.get(0)?;
    let prefix = captures.get(1)?.as_str();
    let rest = &input[whole.end()..];

    let port_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let port = &rest[..port_end];
    let is_port = !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit());

    if is_port && looks_like_host(prefix) {
        return None;
    }

    Some(prefix)
}

/// `localhost` or a dotted name of alphanumeric and hyphen labels.
fn looks_like_host(prefix: &str) -> bool {
    if prefix.eq_ignore_ascii_case("localhost") {
        return true;
    }

    prefix.contains('.')
        && prefix.split('.').all(|label| {
            !label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
        })
}

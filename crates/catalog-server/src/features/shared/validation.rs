//! Shared validation utilities
//!
//! # Examples
//!
//! ```rust
//! use catalog_server::features::shared::validation::validate_feed_url;
//!
//! assert!(validate_feed_url("https://example.com/prices.csv").is_ok());
//! assert!(validate_feed_url("ftp://example.com/prices.csv").is_err());
//! ```

use thiserror::Error;
use url::Url;

/// Longest URL accepted for a feed.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("url is required and cannot be empty")]
    Required,

    #[error("url must be at most {max_length} characters")]
    TooLong { max_length: usize },

    #[error("url is invalid: {0}")]
    Unparseable(String),

    #[error("url scheme '{0}' is not supported: must be http or https")]
    UnsupportedScheme(String),

    #[error("url must include a host")]
    MissingHost,
}

/// Validate the location of a price feed
///
/// # Rules
/// - Must not be blank
/// - Must not exceed [`MAX_URL_LENGTH`] characters
/// - Must be an absolute `http://` or `https://` URL with a host
pub fn validate_feed_url(raw: &str) -> Result<Url, UrlValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlValidationError::Required);
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong {
            max_length: MAX_URL_LENGTH,
        });
    }

    let url = Url::parse(raw).map_err(|e| UrlValidationError::Unparseable(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlValidationError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_feed_url_valid() {
        assert!(validate_feed_url("https://example.com/prices.csv").is_ok());
        assert!(validate_feed_url("http://localhost:8080/feed?format=csv").is_ok());
        assert!(validate_feed_url("  https://example.com/x.csv  ").is_ok());
    }

    #[test]
    fn test_validate_feed_url_empty() {
        assert_eq!(validate_feed_url(""), Err(UrlValidationError::Required));
        assert_eq!(validate_feed_url("   "), Err(UrlValidationError::Required));
    }

    #[test]
    fn test_validate_feed_url_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert_eq!(
            validate_feed_url(&url),
            Err(UrlValidationError::TooLong {
                max_length: MAX_URL_LENGTH
            })
        );
    }

    #[test]
    fn test_validate_feed_url_invalid() {
        assert!(matches!(
            validate_feed_url("not a url"),
            Err(UrlValidationError::Unparseable(_))
        ));
        assert!(matches!(
            validate_feed_url("example.com/prices.csv"),
            Err(UrlValidationError::Unparseable(_))
        ));
    }

    #[test]
    fn test_validate_feed_url_scheme() {
        assert_eq!(
            validate_feed_url("ftp://example.com/prices.csv"),
            Err(UrlValidationError::UnsupportedScheme("ftp".to_string()))
        );
        assert_eq!(
            validate_feed_url("file:///tmp/prices.csv"),
            Err(UrlValidationError::UnsupportedScheme("file".to_string()))
        );
    }
}

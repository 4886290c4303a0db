//! Original URL validation.
//!
//! URLs are stored exactly as submitted. Validation only decides whether the
//! input is an absolute URL; it never rewrites it.

use crate::domain::entities::MAX_ORIGINAL_URL_LENGTH;
use url::Url;

/// Reasons an original URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("URL exceeds {MAX_ORIGINAL_URL_LENGTH} characters")]
    TooLong,
}

/// Checks that `input` is an absolute URL of any scheme.
///
/// Relative references (`/path`, `example.com`) fail to parse without a base
/// and are reported as [`UrlValidationError::InvalidFormat`].
///
/// # Examples
///
/// ```ignore
/// assert!(validate_original_url("https://example.com/a").is_ok());
/// assert!(validate_original_url("ftp://files.example.com/a.zip").is_ok());
/// assert!(validate_original_url("not a url").is_err());
/// ```
pub fn validate_original_url(input: &str) -> Result<(), UrlValidationError> {
    if input.chars().count() > MAX_ORIGINAL_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    Ok(())
}

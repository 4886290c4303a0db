//! Core domain entities.
//!
//! - [`ShortenedUrl`] - A short code mapped to an original URL
//! - [`ClickAnalytics`] - A click recorded against a shortened URL
//!
//! Both are built through validating constructors; violations are reported
//! as [`EntityError`].

pub mod click_analytics;
pub mod shortened_url;

pub use click_analytics::ClickAnalytics;
pub use shortened_url::{MAX_ORIGINAL_URL_LENGTH, MAX_SHORT_CODE_LENGTH, ShortenedUrl};

use thiserror::Error;

/// Constructor-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    #[error("Original URL cannot be empty")]
    EmptyOriginalUrl,

    #[error("Short code cannot be empty")]
    EmptyShortCode,

    #[error("IP address cannot be empty")]
    EmptyIpAddress,

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
}

impl EntityError {
    /// Name of the offending field.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyOriginalUrl => "original_url",
            Self::EmptyShortCode => "short_code",
            Self::EmptyIpAddress => "ip_address",
            Self::TooLong { field, .. } => *field,
        }
    }
}

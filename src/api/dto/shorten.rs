//! DTOs for the short URL creation endpoint.

use crate::application::services::{ShortenCommand, ShortenOutcome};
use crate::domain::entities::shortened_url::{
    MAX_CREATED_BY_LENGTH, MAX_ORIGINAL_URL_LENGTH, MAX_SHORT_CODE_LENGTH,
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

// `validator` length bounds are `u64`; mirror the domain limits.
const MAX_ORIGINAL_URL_LENGTH_U64: u64 = MAX_ORIGINAL_URL_LENGTH as u64;
const MAX_SHORT_CODE_LENGTH_U64: u64 = MAX_SHORT_CODE_LENGTH as u64;
const MAX_CREATED_BY_LENGTH_U64: u64 = MAX_CREATED_BY_LENGTH as u64;

/// Compiled regex for custom code validation.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z_-]+$").expect("custom code pattern compiles"));

/// Request to shorten a single URL.
///
/// Field lengths are checked here; URL syntax and reserved codes are checked
/// by the service so the same rules apply to every caller.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateShortUrlRequest {
    /// The URL to shorten. Any absolute URL is accepted.
    #[validate(length(min = 1, max = MAX_ORIGINAL_URL_LENGTH_U64))]
    pub original_url: String,

    /// Optional custom short code, used verbatim.
    #[validate(length(min = 1, max = MAX_SHORT_CODE_LENGTH_U64))]
    #[validate(regex(path = *CUSTOM_CODE_REGEX))]
    pub custom_code: Option<String>,

    /// Optional expiry timestamp. After this time the code answers 410 Gone.
    pub expires_at: Option<DateTime<Utc>>,

    #[validate(length(max = MAX_CREATED_BY_LENGTH_U64))]
    pub created_by: Option<String>,
}

impl From<CreateShortUrlRequest> for ShortenCommand {
    fn from(request: CreateShortUrlRequest) -> Self {
        Self {
            original_url: request.original_url,
            custom_code: request.custom_code,
            expires_at: request.expires_at,
            created_by: request.created_by,
        }
    }
}

/// Response describing a created (or re-used) short URL.
#[derive(Debug, Serialize)]
pub struct CreateShortUrlResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl From<ShortenOutcome> for CreateShortUrlResponse {
    fn from(outcome: ShortenOutcome) -> Self {
        let url = outcome.url;
        Self {
            short_code: url.short_code().to_string(),
            short_url: outcome.short_url,
            original_url: url.original_url().to_string(),
            created_at: url.created_at(),
            expires_at: url.expires_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(custom_code: Option<&str>) -> CreateShortUrlRequest {
        CreateShortUrlRequest {
            original_url: "https://example.com".to_string(),
            custom_code: custom_code.map(str::to_string),
            expires_at: None,
            created_by: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request(None).validate().is_ok());
        assert!(request(Some("My_Link-1")).validate().is_ok());
    }

    #[test]
    fn test_custom_code_rules() {
        assert!(request(Some("")).validate().is_err());
        assert!(request(Some("elevenchars")).validate().is_err());
        assert!(request(Some("no spaces")).validate().is_err());
        assert!(request(Some("slash/")).validate().is_err());
    }

    #[test]
    fn test_empty_url_rejected() {
        let mut req = request(None);
        req.original_url = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_deserialize_rfc3339_expiry() {
        let req: CreateShortUrlRequest = serde_json::from_str(
            r#"{"original_url":"https://example.com","expires_at":"2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert!(req.expires_at.is_some());
        assert!(req.custom_code.is_none());
    }
}

//! Shortened URL entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EntityError;

/// Maximum length of an original URL.
pub const MAX_ORIGINAL_URL_LENGTH: usize = 2048;

/// Maximum length of a short code.
pub const MAX_SHORT_CODE_LENGTH: usize = 10;

/// Maximum length of the `created_by` attribution.
pub const MAX_CREATED_BY_LENGTH: usize = 256;

/// A mapping from a short code to an original URL.
///
/// Fields are private: a record is built through [`ShortenedUrl::create`]
/// (new records) or [`ShortenedUrl::rehydrate`] (records read back from
/// storage), and the only mutations are [`increment_click_count`] and
/// [`deactivate`].
///
/// Expiry is never stored. A record can be active and expired at the same
/// time; see [`ShortenedUrl::is_expired`].
///
/// [`increment_click_count`]: ShortenedUrl::increment_click_count
/// [`deactivate`]: ShortenedUrl::deactivate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortenedUrl {
    id: Uuid,
    original_url: String,
    short_code: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    click_count: i64,
    is_active: bool,
    created_by: Option<String>,
}

impl ShortenedUrl {
    /// Creates a new, active record with a fresh identifier and zero clicks.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError`] if the original URL or short code is empty
    /// (or whitespace only), or if any field exceeds its storage limit.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let url = ShortenedUrl::create("https://example.com", "aZ3kP9q", None, None)?;
    /// assert!(url.is_active());
    /// assert_eq!(url.click_count(), 0);
    /// ```
    pub fn create(
        original_url: impl Into<String>,
        short_code: impl Into<String>,
        created_by: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, EntityError> {
        let original_url = original_url.into();
        let short_code = short_code.into();

        if original_url.trim().is_empty() {
            return Err(EntityError::EmptyOriginalUrl);
        }
        if short_code.trim().is_empty() {
            return Err(EntityError::EmptyShortCode);
        }
        if original_url.chars().count() > MAX_ORIGINAL_URL_LENGTH {
            return Err(EntityError::TooLong {
                field: "original_url",
                max: MAX_ORIGINAL_URL_LENGTH,
            });
        }
        if short_code.chars().count() > MAX_SHORT_CODE_LENGTH {
            return Err(EntityError::TooLong {
                field: "short_code",
                max: MAX_SHORT_CODE_LENGTH,
            });
        }
        if created_by
            .as_ref()
            .is_some_and(|c| c.chars().count() > MAX_CREATED_BY_LENGTH)
        {
            return Err(EntityError::TooLong {
                field: "created_by",
                max: MAX_CREATED_BY_LENGTH,
            });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            original_url,
            short_code,
            created_at: Utc::now(),
            expires_at,
            click_count: 0,
            is_active: true,
            created_by,
        })
    }

    /// Rebuilds a record that was already persisted.
    ///
    /// No validation is performed; storage is trusted to hold records that
    /// passed [`ShortenedUrl::create`].
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: Uuid,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        click_count: i64,
        is_active: bool,
        created_by: Option<String>,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
            expires_at,
            click_count,
            is_active,
            created_by,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn short_code(&self) -> &str {
        &self.short_code
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn click_count(&self) -> i64 {
        self.click_count
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_by(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    /// Records one more click.
    pub fn increment_click_count(&mut self) {
        self.click_count = self.click_count.saturating_add(1);
    }

    /// Soft-deletes the record. Idempotent.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Returns true if `now` is strictly past the expiry time.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

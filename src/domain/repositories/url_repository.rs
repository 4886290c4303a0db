//! Repository trait for shortened URL storage.

use crate::domain::entities::ShortenedUrl;
use crate::error::AppError;
use async_trait::async_trait;

/// Storage capability for shortened URLs.
///
/// The store is the source of truth; caches sit in front of it (see
/// [`crate::application::services::UrlCacheLayer`]). Implementations must
/// enforce uniqueness of `short_code` across all records, active or not.
///
/// Cancellation follows the usual async contract: dropping a returned future
/// abandons the operation.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_url.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Finds an active record by its short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortenedUrl))` if an active record matches
    /// - `Ok(None)` if no record matches or the match is deactivated
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError>;

    /// Checks whether any record, active or not, uses the code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError>;

    /// Persists a new record as a single atomic write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn add(&self, url: &ShortenedUrl) -> Result<(), AppError>;

    /// Finds the newest active record with exactly this original URL.
    ///
    /// Expiry is not considered here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortenedUrl>, AppError>;

    /// Soft-deletes the active record with this code.
    ///
    /// Returns `Ok(true)` if a record was deactivated, `Ok(false)` if none
    /// matched or it was already inactive.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn deactivate(&self, code: &str) -> Result<bool, AppError>;

    /// Verifies the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn ping(&self) -> Result<(), AppError>;
}

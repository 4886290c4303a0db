//! Repository trait for click analytics.

use crate::domain::entities::ClickAnalytics;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Number of clicks on one UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyClickCount {
    pub date: NaiveDate,
    pub count: i64,
}

/// Click summary for a single shortened URL.
#[derive(Debug, Clone)]
pub struct UrlAnalytics {
    pub short_code: String,
    pub original_url: String,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    /// Ascending by date.
    pub daily_clicks: Vec<DailyClickCount>,
}

/// Repository interface for click tracking.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Appends a click and increments the owning URL's click counter.
    ///
    /// Both writes commit together or not at all.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the referenced URL does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_click(&self, click: &ClickAnalytics) -> Result<(), AppError>;

    /// Retrieves the click summary for an active short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlAnalytics))` if an active record matches
    /// - `Ok(None)` otherwise
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn get_url_analytics(&self, code: &str) -> Result<Option<UrlAnalytics>, AppError>;
}

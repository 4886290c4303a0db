//! Click recording and per-URL analytics.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::ClickAnalytics;
use crate::domain::repositories::{AnalyticsRepository, UrlAnalytics};
use crate::error::AppError;

/// Service for recording clicks and reading click summaries.
///
/// Clicks normally arrive through the click worker, never from a request
/// handler directly.
pub struct AnalyticsService<A: AnalyticsRepository + ?Sized> {
    repository: Arc<A>,
}

impl<A: AnalyticsRepository + ?Sized> AnalyticsService<A> {
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    /// Records one click and bumps the URL's click counter.
    ///
    /// Oversized header values are truncated rather than rejected. No
    /// de-duplication is performed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty or oversized IP address,
    /// [`AppError::NotFound`] if the URL no longer exists, and
    /// [`AppError::Internal`] on storage errors.
    pub async fn record_click(
        &self,
        url_id: Uuid,
        ip: &str,
        user_agent: Option<&str>,
        referrer: Option<&str>,
    ) -> Result<(), AppError> {
        let click = ClickAnalytics::create(url_id, ip, user_agent, referrer)?;
        self.repository.record_click(&click).await
    }

    /// Retrieves the click summary for an active short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no active record matches the code.
    pub async fn get_url_analytics(&self, code: &str) -> Result<UrlAnalytics, AppError> {
        self.repository
            .get_url_analytics(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short URL not found", json!({ "code": code })))
    }
}

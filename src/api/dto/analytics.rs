//! DTOs for the per-URL analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::repositories::{DailyClickCount, UrlAnalytics};

/// Click summary for a short code.
#[derive(Debug, Serialize)]
pub struct UrlAnalyticsResponse {
    pub short_code: String,
    pub original_url: String,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    pub daily_clicks: Vec<DailyClickCount>,
}

impl From<UrlAnalytics> for UrlAnalyticsResponse {
    fn from(analytics: UrlAnalytics) -> Self {
        Self {
            short_code: analytics.short_code,
            original_url: analytics.original_url,
            total_clicks: analytics.total_clicks,
            created_at: analytics.created_at,
            daily_clicks: analytics.daily_clicks,
        }
    }
}

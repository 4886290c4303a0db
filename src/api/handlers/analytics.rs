//! Handler for per-URL click analytics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::UrlAnalyticsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click summary for a short code.
///
/// # Endpoint
///
/// `GET /api/urls/{code}/analytics`
///
/// # Response
///
/// ```json
/// {
///   "short_code": "aZ3kP9q",
///   "original_url": "https://example.com",
///   "total_clicks": 42,
///   "created_at": "2025-01-01T12:00:00Z",
///   "daily_clicks": [
///     { "date": "2025-01-01", "count": 40 },
///     { "date": "2025-01-02", "count": 2 }
///   ]
/// }
/// ```
///
/// Clicks are recorded asynchronously, so a redirect may take a moment to
/// show up here.
///
/// # Errors
///
/// Returns 404 if no active short URL has this code.
pub async fn url_analytics_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<UrlAnalyticsResponse>, AppError> {
    let analytics = state.analytics_service.get_url_analytics(&code).await?;
    Ok(Json(analytics.into()))
}

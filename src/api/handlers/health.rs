//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: Store and click queue healthy. A failed cache check is
///   reported as `degraded` but keeps 200, since redirects fall
///   back to the store.
/// - **503 Service Unavailable**: Store or click queue failed
///
/// # Components Checked
///
/// 1. **Store**: Round trip to the URL store
/// 2. **Click Queue**: Checks if channel is open and reports free slots
/// 3. **Cache**: Backend PING (always ok when caching is disabled)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "store": { "status": "ok" },
///     "click_queue": { "status": "ok", "message": "Free slots: 10000" },
///     "cache": { "status": "ok" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let store_check = check_store(&state).await;

    let queue_check = check_click_queue(&state);

    let cache_check = check_cache(&state).await;

    let serving = store_check.is_ok() && queue_check.is_ok();
    let all_healthy = serving && cache_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            store: store_check,
            click_queue: queue_check,
            cache: cache_check,
        },
    };

    if serving {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_store(state: &AppState) -> CheckStatus {
    match state.url_repository.ping().await {
        Ok(()) => CheckStatus::ok(None),
        Err(e) => CheckStatus::error(format!("Store error: {e}")),
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.click_sender.is_closed() {
        CheckStatus::error("Click queue is closed")
    } else {
        CheckStatus::ok(Some(format!(
            "Free slots: {}",
            state.click_sender.capacity()
        )))
    }
}

async fn check_cache(state: &AppState) -> CheckStatus {
    if state.url_cache.health_check().await {
        CheckStatus::ok(None)
    } else {
        CheckStatus::error("Cache connection failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::AnalyticsService;
    use crate::domain::click_event::ClickEvent;
    use crate::domain::repositories::AnalyticsRepository;
    use crate::infrastructure::cache::MockCacheService;
    use crate::infrastructure::persistence::InMemoryStore;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn state_with_cache(cache: MockCacheService) -> (AppState, mpsc::Receiver<ClickEvent>) {
        let store = InMemoryStore::new();
        let (tx, rx) = mpsc::channel(8);
        let analytics_repo: Arc<dyn AnalyticsRepository> = Arc::new(store.clone());
        let state = AppState::new(
            Arc::new(store),
            Arc::new(AnalyticsService::new(analytics_repo)),
            Arc::new(cache),
            tx,
            "http://localhost:3000",
        );
        (state, rx)
    }

    #[tokio::test]
    async fn test_cache_failure_is_degraded_but_ok() {
        let mut cache = MockCacheService::new();
        cache.expect_health_check().returning(|| false);
        let (state, _rx) = state_with_cache(cache);

        let Json(body) = health_handler(State(state))
            .await
            .expect("cache outage keeps 200");

        assert_eq!(body.status, "degraded");
        assert!(body.checks.store.is_ok());
        assert!(body.checks.click_queue.is_ok());
        assert!(!body.checks.cache.is_ok());
    }

    #[tokio::test]
    async fn test_closed_queue_is_unavailable() {
        let mut cache = MockCacheService::new();
        cache.expect_health_check().returning(|| true);
        let (state, rx) = state_with_cache(cache);
        drop(rx);

        let (status, Json(body)) = health_handler(State(state)).await.unwrap_err();

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
    }
}

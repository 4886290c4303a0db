//! In-memory storage.
//!
//! Will be destroyed on process shutdown. Used when no database is configured
//! and by the HTTP integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::{ClickAnalytics, ShortenedUrl};
use crate::domain::repositories::{
    AnalyticsRepository, DailyClickCount, UrlAnalytics, UrlRepository,
};
use crate::error::AppError;

#[derive(Debug, Default)]
struct Inner {
    /// All records, active or not
    urls: HashMap<Uuid, ShortenedUrl>,

    /// Short code to record id; codes are never released
    codes: HashMap<String, Uuid>,

    /// Append-only click log
    clicks: Vec<ClickAnalytics>,
}

/// A URL and analytics store held in process memory.
///
/// One lock guards everything, so a click insert and its counter increment
/// are observed together.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded click, oldest first.
    pub async fn clicks(&self) -> Vec<ClickAnalytics> {
        self.inner.lock().await.clicks.clone()
    }
}

#[async_trait]
impl UrlRepository for InMemoryStore {
    async fn get_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .codes
            .get(code)
            .and_then(|id| inner.urls.get(id))
            .filter(|url| url.is_active())
            .cloned())
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.inner.lock().await.codes.contains_key(code))
    }

    async fn add(&self, url: &ShortenedUrl) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        if inner.codes.contains_key(url.short_code()) {
            return Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": url.short_code() }),
            ));
        }

        inner.codes.insert(url.short_code().to_string(), url.id());
        inner.urls.insert(url.id(), url.clone());

        Ok(())
    }

    async fn get_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortenedUrl>, AppError> {
        Ok(self
            .inner
            .lock()
            .await
            .urls
            .values()
            .filter(|url| url.is_active() && url.original_url() == original_url)
            .max_by_key(|url| url.created_at())
            .cloned())
    }

    async fn deactivate(&self, code: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;
        let Some(id) = inner.codes.get(code).copied() else {
            return Ok(false);
        };

        match inner.urls.get_mut(&id) {
            Some(url) if url.is_active() => {
                url.deactivate();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn record_click(&self, click: &ClickAnalytics) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;

        let Some(url) = inner.urls.get_mut(&click.shortened_url_id()) else {
            return Err(AppError::not_found(
                "Short URL not found",
                json!({ "id": click.shortened_url_id() }),
            ));
        };

        url.increment_click_count();
        inner.clicks.push(click.clone());

        Ok(())
    }

    async fn get_url_analytics(&self, code: &str) -> Result<Option<UrlAnalytics>, AppError> {
        let inner = self.inner.lock().await;

        let Some(url) = inner
            .codes
            .get(code)
            .and_then(|id| inner.urls.get(id))
            .filter(|url| url.is_active())
        else {
            return Ok(None);
        };

        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for click in inner
            .clicks
            .iter()
            .filter(|c| c.shortened_url_id() == url.id())
        {
            *per_day.entry(click.clicked_at().date_naive()).or_default() += 1;
        }

        Ok(Some(UrlAnalytics {
            short_code: url.short_code().to_string(),
            original_url: url.original_url().to_string(),
            total_clicks: url.click_count(),
            created_at: url.created_at(),
            daily_clicks: per_day
                .into_iter()
                .map(|(date, count)| DailyClickCount { date, count })
                .collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn url(original: &str, code: &str) -> ShortenedUrl {
        ShortenedUrl::create(original, code, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let store = InMemoryStore::new();
        let record = url("https://example.com", "abc1234");

        store.add(&record).await.unwrap();

        assert_eq!(store.get_by_code("abc1234").await.unwrap(), Some(record));
        assert!(store.exists_by_code("abc1234").await.unwrap());
        assert!(!store.exists_by_code("zzz").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_code_conflicts() {
        let store = InMemoryStore::new();
        store.add(&url("https://a.com", "same")).await.unwrap();

        let result = store.add(&url("https://b.com", "same")).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_deactivated_code_is_hidden_but_reserved() {
        let store = InMemoryStore::new();
        store.add(&url("https://a.com", "abc")).await.unwrap();

        assert!(store.deactivate("abc").await.unwrap());
        assert!(!store.deactivate("abc").await.unwrap());

        assert!(store.get_by_code("abc").await.unwrap().is_none());
        assert!(store.get_by_original_url("https://a.com").await.unwrap().is_none());
        assert!(store.exists_by_code("abc").await.unwrap());
        assert!(matches!(
            store.add(&url("https://c.com", "abc")).await,
            Err(AppError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_by_original_url_exact_match() {
        let store = InMemoryStore::new();
        store.add(&url("https://a.com/x", "one")).await.unwrap();

        assert!(store.get_by_original_url("https://a.com/x").await.unwrap().is_some());
        assert!(store.get_by_original_url("https://a.com/X").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_click_increments_counter() {
        let store = InMemoryStore::new();
        let record = url("https://a.com", "abc");
        store.add(&record).await.unwrap();

        for _ in 0..3 {
            let click = ClickAnalytics::create(record.id(), "10.0.0.1", None, None).unwrap();
            store.record_click(&click).await.unwrap();
        }

        let stored = store.get_by_code("abc").await.unwrap().unwrap();
        assert_eq!(stored.click_count(), 3);
        assert_eq!(store.clicks().await.len(), 3);

        let analytics = store.get_url_analytics("abc").await.unwrap().unwrap();
        assert_eq!(analytics.total_clicks, 3);
        assert_eq!(
            analytics.daily_clicks,
            vec![DailyClickCount {
                date: Utc::now().date_naive(),
                count: 3
            }]
        );
    }

    #[tokio::test]
    async fn test_record_click_unknown_url() {
        let store = InMemoryStore::new();
        let click = ClickAnalytics::create(Uuid::new_v4(), "10.0.0.1", None, None).unwrap();

        assert!(matches!(
            store.record_click(&click).await,
            Err(AppError::NotFound { .. })
        ));
        assert!(store.clicks().await.is_empty());
    }
}

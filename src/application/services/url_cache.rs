//! Read-through cache in front of the URL store.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tracing::{debug, warn};

use crate::domain::entities::ShortenedUrl;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::metrics_consts::{CACHE_ERRORS_TOTAL, CACHE_HITS_TOTAL, CACHE_MISSES_TOTAL};

/// How long a cached record lives.
pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Builds the cache key for a short code.
pub fn cache_key(code: &str) -> String {
    format!("url:{code}")
}

/// Cache-aside wrapper around a [`UrlRepository`].
///
/// The store is the source of truth. The cache only ever holds active records
/// serialized as JSON, and any failure on the cache side (connection errors,
/// unreadable entries) degrades to a store read instead of failing the lookup.
pub struct UrlCacheLayer<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: UrlRepository + ?Sized> UrlCacheLayer<R> {
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Looks up an active record, consulting the cache first.
    ///
    /// On a miss the store is queried and a found record is written back
    /// under `url:{code}` with [`CACHE_TTL`].
    ///
    /// # Errors
    ///
    /// Only store errors are returned. Cache errors are logged and ignored.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<ShortenedUrl>, AppError> {
        let key = cache_key(code);

        match self.cache.get(&key).await {
            Ok(Some(payload)) => match serde_json::from_str::<ShortenedUrl>(&payload) {
                Ok(url) => {
                    debug!(code, "Cache HIT");
                    counter!(CACHE_HITS_TOTAL).increment(1);
                    return Ok(Some(url));
                }
                Err(e) => {
                    warn!(code, error = %e, "Discarding unreadable cache entry");
                    counter!(CACHE_ERRORS_TOTAL, "op" => "decode").increment(1);
                }
            },
            Ok(None) => {
                debug!(code, "Cache MISS");
                counter!(CACHE_MISSES_TOTAL).increment(1);
            }
            Err(e) => {
                warn!(code, error = %e, "Cache read failed, falling back to store");
                counter!(CACHE_ERRORS_TOTAL, "op" => "get").increment(1);
            }
        }

        let Some(url) = self.repository.get_by_code(code).await? else {
            return Ok(None);
        };

        self.write_back(&key, &url).await;

        Ok(Some(url))
    }

    /// Drops the cached entry for `code`, if any.
    pub async fn invalidate(&self, code: &str) {
        if let Err(e) = self.cache.invalidate(&cache_key(code)).await {
            warn!(code, error = %e, "Cache invalidation failed");
            counter!(CACHE_ERRORS_TOTAL, "op" => "invalidate").increment(1);
        }
    }

    /// Reports whether the cache backend answers.
    pub async fn health_check(&self) -> bool {
        self.cache.health_check().await
    }

    async fn write_back(&self, key: &str, url: &ShortenedUrl) {
        let payload = match serde_json::to_string(url) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(key, error = %e, "Failed to serialize record for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key, &payload, CACHE_TTL).await {
            warn!(key, error = %e, "Cache write failed");
            counter!(CACHE_ERRORS_TOTAL, "op" => "set").increment(1);
        }
    }
}

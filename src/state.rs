//! Shared application state injected into every handler.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::services::{
    AnalyticsService, RedirectService, ShortenService, UrlCacheLayer,
};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{AnalyticsRepository, UrlRepository};
use crate::infrastructure::cache::CacheService;

/// Services wired over type-erased repositories.
///
/// Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn UrlRepository>>,
    pub redirect_service: Arc<RedirectService<dyn UrlRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn AnalyticsRepository>>,
    pub url_cache: Arc<UrlCacheLayer<dyn UrlRepository>>,
    pub url_repository: Arc<dyn UrlRepository>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    /// Wires the services around the given store, cache and click queue.
    ///
    /// The same [`UrlCacheLayer`] backs both redirects and deactivation, so
    /// a deactivated code is evicted from the cache redirects read.
    pub fn new(
        url_repository: Arc<dyn UrlRepository>,
        analytics_service: Arc<AnalyticsService<dyn AnalyticsRepository>>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        base_url: &str,
    ) -> Self {
        let url_cache = Arc::new(UrlCacheLayer::new(url_repository.clone(), cache));

        Self {
            shorten_service: Arc::new(ShortenService::new(
                url_repository.clone(),
                url_cache.clone(),
                base_url,
            )),
            redirect_service: Arc::new(RedirectService::new(
                url_cache.clone(),
                click_sender.clone(),
            )),
            analytics_service,
            url_cache,
            url_repository,
            click_sender,
        }
    }
}

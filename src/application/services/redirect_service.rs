//! Short code resolution for redirects.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, error, warn};

use super::url_cache::UrlCacheLayer;
use crate::domain::click_event::{ClickContext, ClickEvent};
use crate::domain::entities::MAX_SHORT_CODE_LENGTH;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::metrics_consts::CLICKS_DROPPED_TOTAL;

/// What a redirect request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Redirect to the original URL.
    Redirect(String),
    /// No active record for the code.
    NotFound,
    /// The record exists but its expiry has passed.
    Gone,
}

/// Resolves short codes and hands click events to the click queue.
pub struct RedirectService<R: UrlRepository + ?Sized> {
    cache: Arc<UrlCacheLayer<R>>,
    clicks: mpsc::Sender<ClickEvent>,
}

impl<R: UrlRepository + ?Sized> RedirectService<R> {
    pub fn new(cache: Arc<UrlCacheLayer<R>>, clicks: mpsc::Sender<ClickEvent>) -> Self {
        Self { cache, clicks }
    }

    /// Resolves `code` to a redirect target.
    ///
    /// Expiry wins over the active flag: an expired record is
    /// [`RedirectOutcome::Gone`] even if it was never deactivated. Only a
    /// successful redirect enqueues a click, and enqueueing never blocks or
    /// changes the outcome.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the lookup itself fails.
    pub async fn resolve(
        &self,
        code: &str,
        context: ClickContext,
    ) -> Result<RedirectOutcome, AppError> {
        if code.is_empty() || code.chars().count() > MAX_SHORT_CODE_LENGTH {
            return Ok(RedirectOutcome::NotFound);
        }

        let Some(url) = self.cache.get_by_code(code).await? else {
            debug!(code, "Short code not found");
            return Ok(RedirectOutcome::NotFound);
        };

        if url.is_expired() {
            debug!(code, "Short code expired");
            return Ok(RedirectOutcome::Gone);
        }

        if !url.is_active() {
            return Ok(RedirectOutcome::NotFound);
        }

        self.enqueue_click(ClickEvent::new(url.id(), context));

        Ok(RedirectOutcome::Redirect(url.original_url().to_string()))
    }

    fn enqueue_click(&self, event: ClickEvent) {
        match self.clicks.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(url_id = %event.url_id, "Click queue full, dropping click");
                counter!(CLICKS_DROPPED_TOTAL, "reason" => "full").increment(1);
            }
            Err(TrySendError::Closed(event)) => {
                error!(url_id = %event.url_id, "Click queue closed, dropping click");
                counter!(CLICKS_DROPPED_TOTAL, "reason" => "closed").increment(1);
            }
        }
    }
}

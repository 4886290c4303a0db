//! Background click recording.
//!
//! Redirects push [`ClickEvent`]s onto a bounded channel; this worker drains
//! it and records each click with bounded parallelism.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::application::services::AnalyticsService;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;
use crate::metrics_consts::{CLICKS_FAILED_TOTAL, CLICKS_RECORDED_TOTAL};

/// Retries after the first failed attempt.
const MAX_RETRIES: usize = 2;

/// Drains `rx` until every sender is dropped.
///
/// At most `concurrency` clicks are recorded at once. Transient failures are
/// retried with jittered exponential backoff; a click that still fails is
/// logged and counted, never surfaced. Returns once the channel is closed and
/// all in-flight clicks have finished.
pub async fn run_click_worker<A>(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<AnalyticsService<A>>,
    concurrency: usize,
) where
    A: AnalyticsRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let permits = Arc::new(Semaphore::new(concurrency));
    let mut in_flight = JoinSet::new();

    info!(concurrency, "Click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };

        let recorder = recorder.clone();
        in_flight.spawn(async move {
            process_click(&recorder, event).await;
            drop(permit);
        });

        while in_flight.try_join_next().is_some() {}
    }

    while in_flight.join_next().await.is_some() {}

    info!("Click worker stopped");
}

async fn process_click<A>(recorder: &AnalyticsService<A>, event: ClickEvent)
where
    A: AnalyticsRepository + ?Sized,
{
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(1))
        .map(jitter)
        .take(MAX_RETRIES);

    let result = RetryIf::spawn(
        strategy,
        || {
            recorder.record_click(
                event.url_id,
                &event.ip,
                event.user_agent.as_deref(),
                event.referrer.as_deref(),
            )
        },
        is_transient,
    )
    .await;

    match result {
        Ok(()) => {
            debug!(url_id = %event.url_id, "Click recorded");
            counter!(CLICKS_RECORDED_TOTAL).increment(1);
        }
        Err(e) => {
            error!(url_id = %event.url_id, error = %e, "Failed to record click");
            counter!(CLICKS_FAILED_TOTAL).increment(1);
        }
    }
}

/// Validation and missing-URL failures will not succeed on retry.
fn is_transient(error: &AppError) -> bool {
    matches!(error, AppError::Internal { .. })
}

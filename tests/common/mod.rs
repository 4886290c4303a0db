#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo, routing::get};
use chrono::{DateTime, Utc};
use shortcut::api::handlers::{health_handler, redirect_handler};
use shortcut::api::routes::api_routes;
use shortcut::application::services::AnalyticsService;
use shortcut::domain::click_event::ClickEvent;
use shortcut::domain::entities::ShortenedUrl;
use shortcut::domain::repositories::{AnalyticsRepository, UrlRepository};
use shortcut::infrastructure::cache::NullCache;
use shortcut::infrastructure::persistence::InMemoryStore;
use shortcut::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "https://sho.rt";

/// Peer address every test request appears to come from.
pub const PEER_IP: &str = "127.0.0.1";

/// Builds state over a fresh in-memory store. The click queue is returned
/// undrained so tests can inspect queued events.
pub fn create_test_state() -> (AppState, mpsc::Receiver<ClickEvent>, InMemoryStore) {
    let store = InMemoryStore::new();
    let (state, rx) = create_state_for(&store);
    (state, rx, store)
}

/// Builds state over an existing store.
pub fn create_state_for(store: &InMemoryStore) -> (AppState, mpsc::Receiver<ClickEvent>) {
    let (tx, rx) = mpsc::channel(100);

    let analytics_repo: Arc<dyn AnalyticsRepository> = Arc::new(store.clone());
    let analytics_service = Arc::new(AnalyticsService::new(analytics_repo));
    let state = AppState::new(
        Arc::new(store.clone()),
        analytics_service,
        Arc::new(NullCache::new()),
        tx,
        BASE_URL,
    );

    (state, rx)
}

/// Every route except rate limiting, with a fixed peer address.
pub fn test_app(state: AppState) -> Router {
    Router::new()
        .route("/{code}", get(redirect_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_routes())
        .layer(MockConnectInfoLayer)
        .with_state(state)
}

pub async fn insert_url(
    store: &InMemoryStore,
    code: &str,
    original_url: &str,
    expires_at: Option<DateTime<Utc>>,
) -> ShortenedUrl {
    let url = ShortenedUrl::create(original_url, code, None, expires_at).unwrap();
    store.add(&url).await.unwrap();
    url
}

#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = format!("{PEER_IP}:12345").parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}

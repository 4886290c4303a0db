//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use serde_json::json;
use std::net::SocketAddr;

use crate::application::services::RedirectOutcome;
use crate::domain::click_event::ClickContext;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code through the cache, falling back to the store
/// 2. Reject expired codes with 410
/// 3. Queue a click event for the background worker
/// 4. Return 307 Temporary Redirect
///
/// Click tracking never delays or fails the redirect. If the queue is full,
/// the click is dropped.
///
/// # Errors
///
/// - 404 `Short URL not found` for unknown or deactivated codes
/// - 410 `Short URL has expired` once `expires_at` has passed
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Redirect, AppError> {
    let context = ClickContext::new(
        addr.ip().to_string(),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        headers.get(header::REFERER).and_then(|v| v.to_str().ok()),
    );

    match state.redirect_service.resolve(&code, context).await? {
        RedirectOutcome::Redirect(url) => Ok(Redirect::temporary(&url)),
        RedirectOutcome::NotFound => Err(AppError::not_found(
            "Short URL not found",
            json!({ "code": code }),
        )),
        RedirectOutcome::Gone => Err(AppError::gone(
            "Short URL has expired",
            json!({ "code": code }),
        )),
    }
}

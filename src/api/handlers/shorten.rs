//! Handlers for short URL creation and deactivation.

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use validator::Validate;

use crate::api::dto::shorten::{CreateShortUrlRequest, CreateShortUrlResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "custom_code": "promo",                    // optional
///   "expires_at": "2030-01-01T00:00:00Z",      // optional
///   "created_by": "marketing"                  // optional
/// }
/// ```
///
/// # Response
///
/// `201 Created` with `Location: /api/urls/{short_code}`:
///
/// ```json
/// {
///   "short_code": "aZ3kP9q",
///   "short_url": "http://localhost:3000/aZ3kP9q",
///   "original_url": "https://example.com/some/long/path",
///   "created_at": "2025-01-01T12:00:00Z",
///   "expires_at": null
/// }
/// ```
///
/// Shortening a URL that already has an active, unexpired short URL returns
/// the existing one.
///
/// # Errors
///
/// - 400 for invalid input
/// - 409 if the custom code is taken
/// - 500 if no free random code was found
pub async fn create_short_url_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateShortUrlRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let outcome = state.shorten_service.shorten(payload.into()).await?;
    let location = format!("/api/urls/{}", outcome.url.short_code());

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CreateShortUrlResponse::from(outcome)),
    ))
}

/// Deactivates a short URL.
///
/// # Endpoint
///
/// `DELETE /api/urls/{code}`
///
/// The record is kept; its code stays reserved and redirects answer 404.
///
/// # Errors
///
/// Returns 404 if no active short URL has this code.
pub async fn delete_short_url_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    state.shorten_service.deactivate(&code).await?;
    Ok(StatusCode::NO_CONTENT)
}

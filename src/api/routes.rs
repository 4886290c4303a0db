//! API route configuration.

use crate::api::handlers::{
    create_short_url_handler, delete_short_url_handler, url_analytics_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// All `/api` routes.
///
/// # Endpoints
///
/// - `POST   /urls`                  - Create a short URL
/// - `DELETE /urls/{code}`           - Deactivate a short URL
/// - `GET    /urls/{code}/analytics` - Click summary for a short URL
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(create_short_url_handler))
        .route("/urls/{code}", delete(delete_short_url_handler))
        .route("/urls/{code}/analytics", get(url_analytics_handler))
}

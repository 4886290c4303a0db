//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod redirect;
pub mod shorten;

pub use analytics::url_analytics_handler;
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shorten::{create_short_url_handler, delete_short_url_handler};

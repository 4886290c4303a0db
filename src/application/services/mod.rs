//! Business logic services for the application layer.

pub mod analytics_service;
pub mod redirect_service;
pub mod shorten_service;
pub mod unique_code;
pub mod url_cache;

pub use analytics_service::AnalyticsService;
pub use redirect_service::{RedirectOutcome, RedirectService};
pub use shorten_service::{ShortenCommand, ShortenOutcome, ShortenService};
pub use unique_code::UniqueCodeResolver;
pub use url_cache::UrlCacheLayer;

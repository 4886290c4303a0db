//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::ShortenService`] - Short URL creation and deactivation
//! - [`services::RedirectService`] - Code resolution and click dispatch
//! - [`services::UrlCacheLayer`] - Cache-aside reads in front of the URL store
//! - [`services::UniqueCodeResolver`] - Collision-checked code generation
//! - [`services::AnalyticsService`] - Click recording and summaries
//! - [`click_worker`] - Background consumer of the click queue

pub mod click_worker;
pub mod services;

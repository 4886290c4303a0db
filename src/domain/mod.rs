//! Domain layer containing business entities and storage contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business logic lives in [`crate::application::services`].
//!
//! # Click Processing Flow
//!
//! 1. The redirect resolver finds an active, unexpired URL
//! 2. A [`click_event::ClickEvent`] is pushed onto a bounded channel
//! 3. [`crate::application::click_worker::run_click_worker`] drains the channel
//! 4. Clicks are persisted via [`repositories::AnalyticsRepository`]

pub mod click_event;
pub mod entities;
pub mod repositories;

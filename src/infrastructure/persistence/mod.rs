//! Repository implementations.
//!
//! PostgreSQL implementations use SQLx runtime queries mapped through
//! `FromRow` row types. [`InMemoryStore`] implements both traits without a
//! database.
//!
//! # Repositories
//!
//! - [`PgUrlRepository`] - Shortened URL storage and lookup
//! - [`PgAnalyticsRepository`] - Click recording and per-URL summaries
//! - [`InMemoryStore`] - Process-local store for development and tests

pub mod memory_store;
pub mod pg_analytics_repository;
pub mod pg_url_repository;

pub use memory_store::InMemoryStore;
pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_url_repository::PgUrlRepository;

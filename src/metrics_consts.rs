//! Metric names emitted through the `metrics` facade.
//!
//! No exporter is installed by this crate; an embedding binary can install
//! one and these counters become visible.

pub const CACHE_HITS_TOTAL: &str = "url_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "url_cache_misses_total";
pub const CACHE_ERRORS_TOTAL: &str = "url_cache_errors_total";

pub const CLICKS_RECORDED_TOTAL: &str = "clicks_recorded_total";
pub const CLICKS_DROPPED_TOTAL: &str = "clicks_dropped_total";
pub const CLICKS_FAILED_TOTAL: &str = "clicks_failed_total";

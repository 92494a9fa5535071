//! Metrics for address set loads
//!
//! Labels are limited to source and outcome, never address content.

use checker_core::Source;
use metrics::{counter, gauge, histogram};
use std::time::Duration;

pub const OUTCOME_OK: &str = "ok";
pub const OUTCOME_ERROR: &str = "error";
pub const OUTCOME_CACHED: &str = "cached";

pub fn record_source_load(source: Source, outcome: &str, duration: Duration) {
    counter!("checker_source_loads_total", "source" => source.as_str(), "outcome" => outcome.to_string())
        .increment(1);
    histogram!("checker_source_load_duration_seconds", "source" => source.as_str())
        .record(duration.as_secs_f64());
}

pub fn record_cache_hit(source: Source) {
    counter!("checker_source_loads_total", "source" => source.as_str(), "outcome" => OUTCOME_CACHED)
        .increment(1);
}

pub fn set_source_entries(source: Source, entries: usize) {
    gauge!("checker_source_entries", "source" => source.as_str()).set(entries as f64);
}

//! Engine metrics. Labels never carry address values.

use checker_core::{LookupResult, Source};
use metrics::{counter, gauge};

pub fn record_lookup(source: Source, result: &LookupResult) {
    counter!("checker_lookups_total", "source" => source.as_str(), "outcome" => result.outcome())
        .increment(1);
}

pub fn record_superseded() {
    counter!("checker_lookups_superseded_total").increment(1);
}

pub fn record_lookup_start() {
    gauge!("checker_lookup_in_flight").increment(1.0);
}

pub fn record_lookup_end() {
    gauge!("checker_lookup_in_flight").decrement(1.0);
}

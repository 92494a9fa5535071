//! Bundled spreadsheet provider

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use checker_core::{AddressSet, Source};

use crate::error::LoaderError;
use crate::loader::LoadResult;
use crate::metrics;
use crate::single_flight::SingleFlight;
use crate::table::read_first_column;

/// Loads the bundled list once and serves it from memory afterwards.
///
/// A failed load leaves the cache as it was; the next call tries again.
pub struct BundledProvider {
    path: PathBuf,
    cache: Arc<ArcSwapOption<AddressSet>>,
    flight: SingleFlight,
}

impl BundledProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Arc::new(ArcSwapOption::empty()),
            flight: SingleFlight::new(Source::Bundled),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Cached set, or a single-flight load of the file
    pub async fn load(&self) -> LoadResult {
        if let Some(set) = self.cache.load_full() {
            metrics::record_cache_hit(Source::Bundled);
            return Ok(set);
        }

        let path = self.path.clone();
        let cache = self.cache.clone();
        self.flight
            .run(move || async move {
                if let Some(set) = cache.load_full() {
                    return Ok(set);
                }

                let started = Instant::now();
                let result = tokio::task::spawn_blocking(move || load_file(&path))
                    .await
                    .map_err(|e| LoaderError::Task(e.to_string()))
                    .and_then(|r| r);

                match result {
                    Ok(set) => {
                        let set = Arc::new(set);
                        cache.store(Some(set.clone()));
                        metrics::record_source_load(Source::Bundled, metrics::OUTCOME_OK, started.elapsed());
                        metrics::set_source_entries(Source::Bundled, set.len());
                        Ok(set)
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load bundled address list");
                        metrics::record_source_load(Source::Bundled, metrics::OUTCOME_ERROR, started.elapsed());
                        Err(e.into_source_error(Source::Bundled))
                    }
                }
            })
            .await
    }

    /// Whether the one-time load is in progress
    pub fn is_loading(&self) -> bool {
        self.flight.in_flight()
    }

    /// Whether a set has been cached
    pub fn is_loaded(&self) -> bool {
        self.cache.load().is_some()
    }

    pub fn cached(&self) -> Option<Arc<AddressSet>> {
        self.cache.load_full()
    }
}

fn load_file(path: &Path) -> Result<AddressSet, LoaderError> {
    let cells = read_first_column(path)?;
    let set = AddressSet::from_raw(Source::Bundled, cells);
    tracing::info!(
        path = %path.display(),
        rows = set.rows_read(),
        addresses = set.len(),
        "Bundled address list loaded"
    );
    Ok(set)
}

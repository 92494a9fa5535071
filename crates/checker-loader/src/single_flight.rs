//! Coalescing of concurrent loads
//!
//! The first caller starts the load on the runtime; callers arriving while it
//! is outstanding await the same shared future and observe the same result,
//! including the same failure. The load runs to completion even if every
//! caller is cancelled, so the in-flight flag never sticks.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use checker_core::{SourceError, Source};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;

use crate::loader::LoadResult;

struct Flight {
    done: Arc<AtomicBool>,
    shared: Shared<BoxFuture<'static, LoadResult>>,
}

/// Single-flight slot for one source
pub struct SingleFlight {
    origin: Source,
    slot: Mutex<Option<Flight>>,
}

impl SingleFlight {
    pub fn new(origin: Source) -> Self {
        Self {
            origin,
            slot: Mutex::new(None),
        }
    }

    /// Join the outstanding load, or start one with `start`
    pub async fn run<F, Fut>(&self, start: F) -> LoadResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadResult> + Send + 'static,
    {
        let shared = self.join_or_start(start);
        shared.await
    }

    /// Whether a load is outstanding
    pub fn in_flight(&self) -> bool {
        self.slot
            .lock()
            .as_ref()
            .map(|flight| !flight.done.load(Ordering::Acquire))
            .unwrap_or(false)
    }

    fn join_or_start<F, Fut>(&self, start: F) -> Shared<BoxFuture<'static, LoadResult>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadResult> + Send + 'static,
    {
        let mut slot = self.slot.lock();

        if let Some(flight) = slot.as_ref() {
            if !flight.done.load(Ordering::Acquire) {
                tracing::debug!(source = %self.origin, "Joining in-flight load");
                return flight.shared.clone();
            }
        }

        let done = Arc::new(AtomicBool::new(false));
        let flag = done.clone();
        let load = start();
        let handle = tokio::spawn(async move {
            let result = load.await;
            flag.store(true, Ordering::Release);
            result
        });

        let origin = self.origin;
        let shared = async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => Err(SourceError::unavailable(origin, format!("load task failed: {}", e))),
            }
        }
        .boxed()
        .shared();

        *slot = Some(Flight {
            done,
            shared: shared.clone(),
        });

        shared
    }
}

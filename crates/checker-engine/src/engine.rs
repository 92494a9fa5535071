//! Lookup engine: debounced submissions and the result state machine
//!
//! ```text
//! Idle --submit--> Pending --debounce, load--> Eligible | NotEligible | Failed
//!   ^                 |  ^                                   |
//!   +--empty submit---+  +------------- submit -------------+
//! ```

use std::sync::Arc;

use checker_core::constants::DEBOUNCE_WINDOW;
use checker_core::{Address, LookupResult, Source};
use checker_loader::AddressLoader;
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::event::{Completion, LookupRequest, UiEvent};
use crate::metrics;

const COMPLETION_CAPACITY: usize = 64;

/// Point-in-time view of everything the engine exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSnapshot {
    pub result: LookupResult,
    pub source: Source,
    pub token: u64,
    pub bundled_loading: bool,
}

struct EngineState {
    /// Token of the latest submission; only its evaluation may commit
    token: u64,
    source: Source,
    task: Option<JoinHandle<()>>,
}

/// State shared between the engine handle and its evaluation tasks
struct Shared {
    state: Mutex<EngineState>,
    result: watch::Sender<LookupResult>,
    completions: broadcast::Sender<Completion>,
}

impl Shared {
    fn is_current(&self, token: u64) -> bool {
        self.state.lock().token == token
    }

    /// Publish a terminal result if `request` is still the latest submission
    fn commit(&self, request: LookupRequest, result: LookupResult) -> bool {
        let state = self.state.lock();
        if state.token != request.token {
            tracing::debug!(
                token = request.token,
                current = state.token,
                "Discarding stale lookup result"
            );
            metrics::record_superseded();
            return false;
        }

        metrics::record_lookup(request.source, &result);
        tracing::info!(
            token = request.token,
            source = %request.source,
            outcome = result.outcome(),
            "Lookup completed"
        );

        self.result.send_replace(result.clone());
        // No subscribers is fine; the watch channel still holds the result.
        let _ = self.completions.send(Completion { request, result });
        true
    }
}

/// Decrements the in-flight gauge however the evaluation ends
struct InFlight;

impl InFlight {
    fn start() -> Self {
        metrics::record_lookup_start();
        InFlight
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        metrics::record_lookup_end();
    }
}

/// Debounced eligibility lookups against a pluggable [`AddressLoader`]
pub struct LookupEngine {
    loader: Arc<dyn AddressLoader>,
    shared: Arc<Shared>,
}

impl LookupEngine {
    /// Create an engine with the default source selection
    pub fn new(loader: Arc<dyn AddressLoader>) -> Self {
        Self::with_source(loader, Source::default())
    }

    pub fn with_source(loader: Arc<dyn AddressLoader>, source: Source) -> Self {
        let (result, _) = watch::channel(LookupResult::Idle);
        let (completions, _) = broadcast::channel(COMPLETION_CAPACITY);

        Self {
            loader,
            shared: Arc::new(Shared {
                state: Mutex::new(EngineState {
                    token: 0,
                    source,
                    task: None,
                }),
                result,
                completions,
            }),
        }
    }

    /// Submit raw input against `source`.
    ///
    /// Supersedes any earlier submission. Input that normalizes to empty moves
    /// the engine to `Idle` and schedules nothing; otherwise the engine moves
    /// to `Pending` and evaluates after the debounce window. Returns the
    /// scheduled request, if any.
    pub fn submit(&self, raw: &str, source: Source) -> Option<LookupRequest> {
        let address = Address::normalize(raw);
        let mut state = self.shared.state.lock();

        state.token += 1;
        let token = state.token;

        if let Some(task) = state.task.take() {
            task.abort();
        }
        if self.shared.result.borrow().is_pending() {
            metrics::record_superseded();
        }

        if address.is_empty() {
            tracing::debug!(token, "Empty submission, nothing to check");
            self.shared.result.send_replace(LookupResult::Idle);
            return None;
        }

        let request = LookupRequest {
            token,
            address,
            source,
        };
        tracing::debug!(token, source = %source, "Lookup scheduled");

        self.shared.result.send_replace(LookupResult::Pending);
        state.task = Some(tokio::spawn(evaluate(
            self.shared.clone(),
            self.loader.clone(),
            request.clone(),
        )));

        Some(request)
    }

    /// Submit against the currently selected source
    pub fn on_submit(&self, raw: &str) -> Option<LookupRequest> {
        let source = self.source();
        self.submit(raw, source)
    }

    /// Change the source used by future submissions.
    ///
    /// Outstanding evaluations keep the source they were submitted with.
    pub fn on_source_change(&self, source: Source) {
        let mut state = self.shared.state.lock();
        if state.source != source {
            tracing::debug!(from = %state.source, to = %source, "Source changed");
            state.source = source;
        }
    }

    pub fn set_source(&self, source: Source) {
        self.on_source_change(source);
    }

    /// Dispatch a typed presentation event
    pub fn handle(&self, event: UiEvent) -> Option<LookupRequest> {
        match event {
            UiEvent::Submit(raw) => self.on_submit(&raw),
            UiEvent::SourceChanged(source) => {
                self.on_source_change(source);
                None
            }
        }
    }

    /// Start loading the bundled list in the background
    pub fn preload_bundled(&self) -> JoinHandle<()> {
        let loader = self.loader.clone();
        tokio::spawn(async move {
            if let Err(e) = loader.load(Source::Bundled).await {
                tracing::warn!(error = %e, "Bundled list preload failed");
            }
        })
    }

    pub fn result(&self) -> LookupResult {
        self.shared.result.borrow().clone()
    }

    /// Receiver that observes every state change
    pub fn watch(&self) -> watch::Receiver<LookupResult> {
        self.shared.result.subscribe()
    }

    /// Receiver of completion events, one per committed evaluation
    pub fn subscribe(&self) -> broadcast::Receiver<Completion> {
        self.shared.completions.subscribe()
    }

    pub fn source(&self) -> Source {
        self.shared.state.lock().source
    }

    /// Whether a submission is awaiting its result
    pub fn is_busy(&self) -> bool {
        self.shared.result.borrow().is_pending()
    }

    /// Load gate: the bundled list is still loading
    pub fn bundled_loading(&self) -> bool {
        self.loader.is_loading(Source::Bundled)
    }

    pub fn current_token(&self) -> u64 {
        self.shared.state.lock().token
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let (source, token) = {
            let state = self.shared.state.lock();
            (state.source, state.token)
        };
        EngineSnapshot {
            result: self.result(),
            source,
            token,
            bundled_loading: self.bundled_loading(),
        }
    }
}

impl Drop for LookupEngine {
    fn drop(&mut self) {
        if let Some(task) = self.shared.state.lock().task.take() {
            task.abort();
        }
    }
}

async fn evaluate(shared: Arc<Shared>, loader: Arc<dyn AddressLoader>, request: LookupRequest) {
    let _in_flight = InFlight::start();

    tokio::time::sleep(DEBOUNCE_WINDOW).await;
    if !shared.is_current(request.token) {
        tracing::debug!(token = request.token, "Lookup superseded during debounce");
        return;
    }

    let result = match loader.load(request.source).await {
        Ok(set) if set.contains(&request.address) => LookupResult::Eligible,
        Ok(_) => LookupResult::NotEligible,
        Err(e) => {
            tracing::warn!(token = request.token, error = %e, "Lookup failed");
            LookupResult::Failed(e)
        }
    };

    shared.commit(request, result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use checker_core::{AddressSet, SourceError};
    use checker_loader::LoadResult;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::broadcast::error::TryRecvError;
    use tokio::time::Instant;

    struct FakeLoader {
        bundled: LoadResult,
        remote: LoadResult,
        delays: Mutex<VecDeque<Duration>>,
        calls: Mutex<Vec<Source>>,
        loading: AtomicBool,
    }

    impl FakeLoader {
        fn new() -> Self {
            Self {
                bundled: Ok(Arc::new(AddressSet::from_raw(Source::Bundled, ["0xaaa", "0xbbb"]))),
                remote: Ok(Arc::new(AddressSet::from_raw(Source::Remote, ["0xddd"]))),
                delays: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                loading: AtomicBool::new(false),
            }
        }

        fn failing_remote(mut self) -> Self {
            self.remote = Err(SourceError::unavailable(Source::Remote, "HTTP status 503"));
            self
        }

        fn with_delays(self, delays: &[u64]) -> Self {
            *self.delays.lock() = delays.iter().map(|ms| Duration::from_millis(*ms)).collect();
            self
        }

        fn calls(&self) -> Vec<Source> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl AddressLoader for FakeLoader {
        async fn load(&self, source: Source) -> LoadResult {
            self.calls.lock().push(source);
            let delay = self.delays.lock().pop_front().unwrap_or_default();
            tokio::time::sleep(delay).await;
            match source {
                Source::Bundled => self.bundled.clone(),
                Source::Remote => self.remote.clone(),
            }
        }

        fn is_loading(&self, source: Source) -> bool {
            source == Source::Bundled && self.loading.load(Ordering::SeqCst)
        }
    }

    fn engine_with(loader: FakeLoader) -> (LookupEngine, Arc<FakeLoader>) {
        let loader = Arc::new(loader);
        (LookupEngine::new(loader.clone()), loader)
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_state() {
        let (engine, _) = engine_with(FakeLoader::new());
        assert_eq!(engine.result(), LookupResult::Idle);
        assert_eq!(engine.source(), Source::Remote);
        assert_eq!(engine.current_token(), 0);
        assert!(!engine.is_busy());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_goes_idle_without_evaluation() {
        let (engine, loader) = engine_with(FakeLoader::new());
        let mut completions = engine.subscribe();

        assert_eq!(engine.submit("", Source::Bundled), None);
        assert_eq!(engine.result(), LookupResult::Idle);
        assert_eq!(engine.submit("   ", Source::Bundled), None);
        assert_eq!(engine.result(), LookupResult::Idle);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(loader.calls().is_empty());
        assert!(matches!(completions.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_then_eligible_after_debounce() {
        let (engine, loader) = engine_with(FakeLoader::new());
        let mut completions = engine.subscribe();
        let start = Instant::now();

        let request = engine.submit("0xAAA ", Source::Bundled).expect("scheduled");
        assert_eq!(request.address.as_str(), "0xaaa");
        assert_eq!(engine.result(), LookupResult::Pending);
        assert!(engine.is_busy());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(engine.result(), LookupResult::Pending);
        assert!(loader.calls().is_empty());

        let completion = completions.recv().await.unwrap();
        assert!(start.elapsed() >= DEBOUNCE_WINDOW);
        assert_eq!(completion.request, request);
        assert_eq!(completion.result, LookupResult::Eligible);
        assert_eq!(engine.result(), LookupResult::Eligible);

        engine.submit("0xccc", Source::Bundled);
        let completion = completions.recv().await.unwrap();
        assert_eq!(completion.result, LookupResult::NotEligible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_collapses_to_last_submission() {
        let (engine, loader) = engine_with(FakeLoader::new());
        let mut completions = engine.subscribe();
        let start = Instant::now();

        let mut last = None;
        for (i, raw) in ["0xa", "0xaa", "0xaaa", "0xccc"].into_iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
            last = engine.submit(raw, Source::Bundled);
        }
        let last = last.unwrap();

        let completion = completions.recv().await.unwrap();
        assert_eq!(completion.request.token, last.token);
        assert_eq!(completion.result, LookupResult::NotEligible);
        assert!(start.elapsed() >= Duration::from_millis(800));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(completions.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(loader.calls(), vec![Source::Bundled]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_superseded_evaluation_never_overwrites() {
        // First load takes 2s, second is immediate
        let (engine, loader) = engine_with(FakeLoader::new().with_delays(&[2000, 0]));
        let mut completions = engine.subscribe();

        engine.submit("0xaaa", Source::Bundled).unwrap();
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(loader.calls().len(), 1);

        let newer = engine.submit("0xccc", Source::Bundled).unwrap();
        assert_eq!(engine.result(), LookupResult::Pending);

        let completion = completions.recv().await.unwrap();
        assert_eq!(completion.request.token, newer.token);
        assert_eq!(completion.result, LookupResult::NotEligible);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(completions.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(engine.result(), LookupResult::NotEligible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_rejects_stale_token() {
        let (engine, _) = engine_with(FakeLoader::new());
        let stale = engine.submit("0xaaa", Source::Bundled).unwrap();
        let current = engine.submit("0xbbb", Source::Bundled).unwrap();

        assert!(!engine.shared.commit(stale, LookupResult::Eligible));
        assert_eq!(engine.result(), LookupResult::Pending);

        assert!(engine.shared.commit(current, LookupResult::NotEligible));
        assert_eq!(engine.result(), LookupResult::NotEligible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_submission_cancels_pending() {
        let (engine, loader) = engine_with(FakeLoader::new());
        let mut completions = engine.subscribe();

        engine.submit("0xaaa", Source::Bundled).unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(engine.submit("  ", Source::Bundled), None);
        assert_eq!(engine.result(), LookupResult::Idle);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(loader.calls().is_empty());
        assert!(matches!(completions.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(engine.result(), LookupResult::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_source_switch_does_not_affect_outstanding_request() {
        let (engine, loader) = engine_with(FakeLoader::new());
        let mut completions = engine.subscribe();

        let request = engine.on_submit("0xaaa").unwrap();
        assert_eq!(request.source, Source::Remote);
        engine.on_source_change(Source::Bundled);
        assert_eq!(engine.source(), Source::Bundled);

        let completion = completions.recv().await.unwrap();
        assert_eq!(completion.request.source, Source::Remote);
        assert_eq!(completion.result, LookupResult::NotEligible);
        assert_eq!(loader.calls(), vec![Source::Remote]);

        let request = engine.on_submit("0xaaa").unwrap();
        assert_eq!(request.source, Source::Bundled);
        assert_eq!(completions.recv().await.unwrap().result, LookupResult::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_a_value_and_not_retried() {
        let (engine, loader) = engine_with(FakeLoader::new().failing_remote());
        let mut completions = engine.subscribe();

        engine.submit("0xaaa", Source::Remote).unwrap();
        let completion = completions.recv().await.unwrap();
        match completion.result {
            LookupResult::Failed(err) => assert_eq!(err.origin(), Source::Remote),
            other => panic!("expected failure, got {:?}", other),
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(engine.result(), LookupResult::Failed(_)));
        assert_eq!(loader.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ui_events() {
        let (engine, _) = engine_with(FakeLoader::new());
        let mut completions = engine.subscribe();

        assert_eq!(engine.handle(UiEvent::SourceChanged(Source::Bundled)), None);
        let request = engine.handle(UiEvent::Submit(" 0xBBB".into())).unwrap();
        assert_eq!(request.source, Source::Bundled);
        assert_eq!(completions.recv().await.unwrap().result, LookupResult::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_sees_pending_then_terminal() {
        let (engine, _) = engine_with(FakeLoader::new());
        let mut rx = engine.watch();

        engine.submit("0xaaa", Source::Bundled);
        assert_eq!(*rx.borrow_and_update(), LookupResult::Pending);

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), LookupResult::Eligible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reports_load_gate() {
        let (engine, loader) = engine_with(FakeLoader::new());
        assert!(!engine.bundled_loading());

        loader.loading.store(true, Ordering::SeqCst);
        let snapshot = engine.snapshot();
        assert!(snapshot.bundled_loading);
        assert_eq!(snapshot.result, LookupResult::Idle);
        assert_eq!(snapshot.source, Source::Remote);
    }

    #[tokio::test(start_paused = true)]
    async fn test_preload_bundled_calls_loader() {
        let (engine, loader) = engine_with(FakeLoader::new());
        engine.preload_bundled().await.unwrap();
        assert_eq!(loader.calls(), vec![Source::Bundled]);
        assert_eq!(engine.result(), LookupResult::Idle);
    }
}

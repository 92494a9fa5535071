//! Typed boundary between the engine and a presentation adapter

use checker_core::{Address, LookupResult, Source};

/// Events a presentation adapter forwards into the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// Raw address text submitted for checking
    Submit(String),
    /// User picked a different address source
    SourceChanged(Source),
}

/// One scheduled lookup: canonical address and the source captured at submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub token: u64,
    pub address: Address,
    pub source: Source,
}

/// Emitted exactly once per evaluation that commits a terminal result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub request: LookupRequest,
    pub result: LookupResult,
}

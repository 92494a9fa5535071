//! wallet-checker: eligibility-list lookups for wallet addresses
//!
//! Re-exports the workspace crates:
//! - [`core`]: canonical addresses, address sets, results, configuration
//! - [`loader`]: bundled and remote providers behind [`loader::AddressLoader`]
//! - [`engine`]: the debounced [`engine::LookupEngine`]

pub use checker_core as core;
pub use checker_engine as engine;
pub use checker_loader as loader;

pub use checker_core::{Address, AddressSet, CheckerConfig, LookupResult, Source, SourceError};
pub use checker_engine::{Completion, LookupEngine, LookupRequest, UiEvent};
pub use checker_loader::{AddressLoader, SourceLoader};

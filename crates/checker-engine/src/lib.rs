//! checker-engine: Debounced eligibility lookups
//!
//! [`LookupEngine`] owns the current source selection and the single
//! observable [`LookupResult`]. Submissions are debounced on the trailing
//! edge: a burst of input collapses into one evaluation, fired once input
//! has been quiet for [`DEBOUNCE_WINDOW`]. Each submission carries a token;
//! an evaluation commits only while its token is still the latest, so a
//! superseded lookup can never overwrite a newer result.
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use checker_core::{CheckerConfig, Source};
//! use checker_engine::LookupEngine;
//! use checker_loader::SourceLoader;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let loader = SourceLoader::new(&CheckerConfig::default())?;
//!     let engine = LookupEngine::new(Arc::new(loader));
//!     let mut completions = engine.subscribe();
//!     engine.submit("0xABC", Source::Remote);
//!     let completion = completions.recv().await?;
//!     println!("{:?}", completion.result);
//!     Ok(())
//! }
//! ```
//!
//! [`DEBOUNCE_WINDOW`]: checker_core::constants::DEBOUNCE_WINDOW

mod engine;
mod event;
pub mod metrics;

pub use engine::{EngineSnapshot, LookupEngine};
pub use event::{Completion, LookupRequest, UiEvent};

pub use checker_core::{LookupResult, Source};

//! checker-loader: Address set providers
//!
//! Two interchangeable providers produce normalized [`AddressSet`]s:
//! - [`BundledProvider`]: spreadsheet file shipped with the app, loaded once
//!   and cached for the lifetime of the provider
//! - [`RemoteProvider`]: hosted spreadsheet CSV export, fetched fresh per call
//!
//! Concurrent loads of the same source are coalesced by [`SingleFlight`].
//! [`SourceLoader`] owns both providers and implements [`AddressLoader`],
//! the seam the lookup engine depends on.

mod bundled;
mod error;
mod loader;
pub mod metrics;
mod remote;
mod single_flight;
mod table;

pub use bundled::BundledProvider;
pub use error::LoaderError;
pub use loader::{AddressLoader, LoadResult, SourceLoader};
pub use remote::RemoteProvider;
pub use single_flight::SingleFlight;
pub use table::{parse_csv_first_column, parse_remote_csv, read_first_column};

pub use checker_core::AddressSet;

//! checker-core: Core types for the wallet eligibility checker
//!
//! This crate defines the vocabulary shared by the loader and the engine:
//! - [`Address`]: canonical (trimmed, lower-cased) wallet address
//! - [`AddressSet`]: immutable, origin-tagged set of canonical addresses
//! - [`Source`]: which provider an address set comes from
//! - [`LookupResult`]: the single externally observable engine state
//!
//! Both user input and every list entry pass through [`Address::normalize`],
//! so the two sides of a membership test are always in the same form.

mod address;
mod config;
mod error;
mod result;
mod set;
mod source;

pub use address::Address;
pub use config::CheckerConfig;
pub use error::{Error, SourceError};
pub use result::LookupResult;
pub use set::AddressSet;
pub use source::{ParseSourceError, Source};

pub type Result<T> = std::result::Result<T, Error>;

/// Fixed parameters of the checker
pub mod constants {
    use std::time::Duration;

    /// Quiescence window between the last submission and its evaluation
    pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(500);

    /// Hosted spreadsheet document id
    pub const DEFAULT_SHEET_ID: &str = "1beY6FRDhwafhu59i7L7WJv7cAtotzqRHq8oCDhDNfYU";

    /// Tab (gid) within the hosted spreadsheet
    pub const DEFAULT_SHEET_GID: &str = "151944572";

    /// Host serving the spreadsheet CSV export
    pub const DEFAULT_REMOTE_BASE_URL: &str = "https://docs.google.com";

    /// Bundled eligibility list, relative to the working directory
    pub const DEFAULT_BUNDLED_PATH: &str = "assets/eligible.xlsx";

    /// Remote fetch timeout in milliseconds
    pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
}

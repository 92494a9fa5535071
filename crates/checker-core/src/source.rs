//! Address list providers

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which provider an address set is resolved from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Spreadsheet file shipped with the application
    Bundled,
    /// Hosted spreadsheet fetched over HTTP
    #[default]
    Remote,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Bundled => "bundled",
            Source::Remote => "remote",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source: {0} (expected \"bundled\" or \"remote\")")]
pub struct ParseSourceError(String);

impl FromStr for Source {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundled" | "local" => Ok(Source::Bundled),
            "remote" | "google" => Ok(Source::Remote),
            other => Err(ParseSourceError(other.to_string())),
        }
    }
}

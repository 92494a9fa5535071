//! Error types for checker-core

use thiserror::Error;

use crate::Source;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure to resolve an address set.
///
/// Carried as a value inside [`crate::LookupResult::Failed`] and shared
/// between every caller of a coalesced load, hence `Clone`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{origin} source unavailable: {reason}")]
    Unavailable { origin: Source, reason: String },
}

impl SourceError {
    pub fn unavailable(origin: Source, reason: impl Into<String>) -> Self {
        SourceError::Unavailable {
            origin,
            reason: reason.into(),
        }
    }

    /// Provider that failed
    pub fn origin(&self) -> Source {
        match self {
            SourceError::Unavailable { origin, .. } => *origin,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            SourceError::Unavailable { reason, .. } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        let err = SourceError::unavailable(Source::Remote, "HTTP 503");
        assert_eq!(err.to_string(), "remote source unavailable: HTTP 503");
        assert_eq!(err.origin(), Source::Remote);
        assert_eq!(err.reason(), "HTTP 503");
    }
}

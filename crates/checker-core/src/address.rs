//! Address canonicalization

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wallet address in canonical form: trimmed and lower-cased.
///
/// No format validation is applied. Two addresses are equal exactly when
/// their canonical strings are equal. The empty canonical value is the
/// "nothing to check" sentinel and never appears in an [`crate::AddressSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Canonicalize a raw string. Total and side-effect free.
    pub fn normalize(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Canonicalize, returning `None` for the empty sentinel
    pub fn parse(raw: &str) -> Option<Self> {
        let address = Self::normalize(raw);
        if address.is_empty() {
            None
        } else {
            Some(address)
        }
    }

    /// The empty sentinel
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

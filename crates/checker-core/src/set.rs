//! Origin-tagged address sets

use std::collections::HashSet;
use std::time::SystemTime;

use crate::{Address, Source};

/// Immutable set of canonical addresses loaded from one source
#[derive(Debug, Clone)]
pub struct AddressSet {
    addresses: HashSet<Address>,
    origin: Source,
    loaded_at: SystemTime,
    rows_read: usize,
}

impl AddressSet {
    /// Build a set from raw cells, normalizing each and dropping empties
    pub fn from_raw<I, S>(origin: Source, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows_read = 0;
        let addresses = cells
            .into_iter()
            .inspect(|_| rows_read += 1)
            .filter_map(|cell| Address::parse(cell.as_ref()))
            .collect();

        Self {
            addresses,
            origin,
            loaded_at: SystemTime::now(),
            rows_read,
        }
    }

    /// Exact membership on canonical form. The empty sentinel is never a member.
    pub fn contains(&self, address: &Address) -> bool {
        self.addresses.contains(address)
    }

    pub fn origin(&self) -> Source {
        self.origin
    }

    pub fn loaded_at(&self) -> SystemTime {
        self.loaded_at
    }

    /// Number of distinct canonical addresses
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Number of rows seen before empties and duplicates were dropped
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.addresses.iter()
    }
}

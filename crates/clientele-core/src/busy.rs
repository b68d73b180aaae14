// ── Per-item in-flight tracking ──
//
// An entity with a mutation outstanding is "busy": a second mutation on
// it is refused before any remote call. Marks are RAII guards, so every
// exit path (success, error, dropped future) releases them.

use std::fmt;

use dashmap::DashSet;
use serde::Serialize;

use crate::error::CoreError;
use crate::model::{AddressId, CustomerId};

/// Identity of a busy entity. Customers and addresses are separate key spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum BusyKey {
    Customer(CustomerId),
    Address(AddressId),
}

impl fmt::Display for BusyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer(id) => write!(f, "customer {id}"),
            Self::Address(id) => write!(f, "address {id}"),
        }
    }
}

impl From<CustomerId> for BusyKey {
    fn from(id: CustomerId) -> Self {
        Self::Customer(id)
    }
}

impl From<AddressId> for BusyKey {
    fn from(id: AddressId) -> Self {
        Self::Address(id)
    }
}

#[derive(Default)]
pub(crate) struct BusySet {
    keys: DashSet<BusyKey>,
}

impl BusySet {
    /// Mark `key` busy, or fail with [`CoreError::Busy`] if it already is.
    pub(crate) fn acquire(&self, key: BusyKey) -> Result<BusyGuard<'_>, CoreError> {
        if self.keys.insert(key) {
            Ok(BusyGuard { set: self, key })
        } else {
            Err(CoreError::Busy { key })
        }
    }

    pub(crate) fn contains(&self, key: BusyKey) -> bool {
        self.keys.contains(&key)
    }

    /// Currently busy keys, sorted.
    pub(crate) fn keys(&self) -> Vec<BusyKey> {
        let mut keys: Vec<_> = self.keys.iter().map(|k| *k).collect();
        keys.sort_unstable();
        keys
    }
}

pub(crate) struct BusyGuard<'a> {
    set: &'a BusySet,
    key: BusyKey,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.set.keys.remove(&self.key);
    }
}

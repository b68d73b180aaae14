// ── Customer record store ──
//
// Single shared collection of customers with their nested addresses
// and synthetic orders. Readers get cheap snapshots; writes are
// crate-private so that only the coordinator (and the initial fetch)
// can change what the views see.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use super::collection::{Keyed, OrderedCollection};
use crate::filter::{self, FilterCriteria};
use crate::model::{Address, AddressId, Customer, CustomerId, CustomerInput};
use crate::stream::{CustomerSnapshot, CustomerStream};

impl Keyed for Customer {
    type Key = CustomerId;

    fn key(&self) -> CustomerId {
        self.id
    }
}

/// Reactive store for customer records.
///
/// Snapshot order is collection order: initial fetch order, with newly
/// created customers appended at the end.
pub struct RecordStore {
    pub(crate) customers: OrderedCollection<Customer>,
    pub(crate) last_full_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl RecordStore {
    pub fn new() -> Self {
        let (last_full_refresh, _) = watch::channel(None);
        Self {
            customers: OrderedCollection::new(),
            last_full_refresh,
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    pub fn snapshot(&self) -> CustomerSnapshot {
        self.customers.snapshot()
    }

    /// Subscribe to store changes.
    pub fn subscribe(&self) -> CustomerStream {
        CustomerStream::new(self.customers.subscribe())
    }

    /// Run the filter engine over the current snapshot.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Arc<Customer>> {
        filter::filter(self.customers.snapshot().as_slice(), criteria)
    }

    // ── Single-entity lookups ────────────────────────────────────────

    pub fn customer(&self, id: CustomerId) -> Option<Arc<Customer>> {
        self.customers.get(id)
    }

    /// The customer owning a given address.
    pub fn customer_by_address(&self, id: AddressId) -> Option<Arc<Customer>> {
        self.customers.find(|c| c.address(id).is_some())
    }

    pub fn address(&self, id: AddressId) -> Option<Address> {
        self.customer_by_address(id)
            .and_then(|c| c.address(id).cloned())
    }

    // ── Count accessors ──────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Bumped on every effective mutation.
    pub fn version(&self) -> u64 {
        self.customers.version()
    }

    pub fn last_full_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_full_refresh.borrow()
    }

    // ── Customer writes ──────────────────────────────────────────────

    /// Append a customer, or replace it in place if the id is known.
    /// Returns `true` if the customer was new.
    pub(crate) fn insert(&self, customer: Customer) -> bool {
        self.customers.upsert(customer)
    }

    /// Apply edited fields to an existing customer in one step, keeping
    /// its position, addresses and orders.
    pub(crate) fn apply_input(
        &self,
        id: CustomerId,
        input: &CustomerInput,
    ) -> Option<Arc<Customer>> {
        self.customers.update(id, |c| Some(c.with_input(input)))
    }

    /// Remove a customer and, with it, all of its addresses.
    pub(crate) fn remove(&self, id: CustomerId) -> Option<Arc<Customer>> {
        self.customers.remove(id)
    }

    // ── Address writes ───────────────────────────────────────────────

    /// Append an address to its owning customer's sequence.
    pub(crate) fn push_address(&self, address: Address) -> Option<Arc<Customer>> {
        self.customers.update(address.customer_id, |c| {
            let mut next = c.clone();
            next.addresses.push(address);
            Some(next)
        })
    }

    /// Replace an address in place, leaving its siblings' order untouched.
    pub(crate) fn replace_address(&self, address: Address) -> Option<Arc<Customer>> {
        let owner = self.customer_by_address(address.id)?;
        self.customers.update(owner.id, |c| {
            let mut next = c.clone();
            let slot = next.addresses.iter_mut().find(|a| a.id == address.id)?;
            *slot = Address {
                customer_id: c.id,
                ..address
            };
            Some(next)
        })
    }

    /// Remove an address from whichever customer owns it.
    pub(crate) fn remove_address(&self, id: AddressId) -> Option<Address> {
        let owner = self.customer_by_address(id)?;
        let mut removed = None;
        self.customers.update(owner.id, |c| {
            let pos = c.addresses.iter().position(|a| a.id == id)?;
            let mut next = c.clone();
            removed = Some(next.addresses.remove(pos));
            Some(next)
        });
        removed
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::new()
    }
}

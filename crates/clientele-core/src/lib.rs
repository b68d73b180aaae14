//! Customer records core between `clientele-api` and view adapters (CLI).
//!
//! This crate owns the business logic, domain model and reactive data
//! infrastructure of the clientele console:
//!
//! - **[`Coordinator`]**: Central facade. [`load()`](Coordinator::load)
//!   fills the Record Store; create/update/delete operations validate
//!   locally, call the customer service through [`CustomerRemote`], and
//!   reconcile the store only after the call succeeds. Exposes per-item
//!   busy state and the two-step deletion protocol.
//!
//! - **[`RecordStore`]**: Ordered reactive storage built on
//!   `tokio::sync::watch` channels. Snapshot order is display order.
//!
//! - **[`CustomerStream`]**: Subscription handle vended by the store.
//!   Exposes `current()` / `latest()` / `changed()` so a view can re-run
//!   its filter whenever the data changes.
//!
//! - **Filter engine** ([`filter`]): Pure multi-criteria filtering over a
//!   snapshot, driven by [`FilterCriteria`].
//!
//! - **[`DeletionState`]**: The confirmation state machine gating every
//!   customer deletion.
//!
//! - **[`Command`]**: Typed message-style access to every coordinator
//!   operation.

pub mod busy;
pub mod command;
pub mod config;
pub mod coordinator;
pub mod deletion;
pub mod error;
pub mod filter;
pub mod model;
pub mod orders;
pub mod remote;
pub mod store;
pub mod stream;
pub mod validate;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod testing;

// ── Primary re-exports ──────────────────────────────────────────────
pub use busy::BusyKey;
pub use command::{Command, CommandResult};
pub use config::ConsoleConfig;
pub use coordinator::{Coordinator, DeleteOutcome};
pub use deletion::{DeletionError, DeletionState};
pub use error::{CoreError, Operation};
pub use filter::{AddressCountFilter, FilterCriteria};
pub use orders::{NoOrders, OrderSource, SyntheticOrders};
pub use remote::CustomerRemote;
pub use store::RecordStore;
pub use stream::{CustomerSnapshot, CustomerStream};
pub use validate::FieldError;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Address, AddressId, AddressInput, Customer, CustomerId, CustomerInput, OfferType, Order,
    OrderStatus, PaymentMethod,
};

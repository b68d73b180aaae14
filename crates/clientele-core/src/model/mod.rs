// ── Domain model ──
//
// Canonical types shared by the store, the filter engine and every
// view adapter.

pub mod customer;
pub mod entity_id;
pub mod order;

pub use customer::{Address, AddressInput, Customer, CustomerInput};
pub use entity_id::{AddressId, CustomerId};
pub use order::{OfferType, Order, OrderStatus, PaymentMethod};

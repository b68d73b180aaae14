// ── Record Store ──
//
// The in-memory authoritative copy of customer data, with push-based
// change notification.

mod collection;
mod record_store;
mod refresh;

pub use record_store::RecordStore;

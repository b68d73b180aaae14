// ── Full refresh application ──
//
// Applies a complete customer listing to the store. The incoming order
// becomes the display order.

use chrono::Utc;
use tracing::debug;

use super::RecordStore;
use crate::model::Customer;

impl RecordStore {
    /// Replace the store contents with a freshly fetched listing and
    /// stamp `last_full_refresh`.
    pub(crate) fn replace_all(&self, customers: Vec<Customer>) {
        let count = customers.len();
        self.customers.replace_all(customers);
        self.last_full_refresh.send_replace(Some(Utc::now()));
        debug!(customers = count, version = self.version(), "applied full refresh");
    }
}

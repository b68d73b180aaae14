// ── Reactive customer stream ──
//
// Subscription type for consuming Record Store changes.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::filter::{self, FilterCriteria};
use crate::model::Customer;

/// An ordered store snapshot.
pub type CustomerSnapshot = Arc<Vec<Arc<Customer>>>;

/// A subscription to the Record Store.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via [`changed()`](Self::changed) or by converting to a
/// `Stream`. A view adapter re-runs its filter on each new snapshot.
pub struct CustomerStream {
    current: CustomerSnapshot,
    receiver: watch::Receiver<CustomerSnapshot>,
}

impl CustomerStream {
    pub(crate) fn new(receiver: watch::Receiver<CustomerSnapshot>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time (or at the last `changed()`).
    pub fn current(&self) -> &CustomerSnapshot {
        &self.current
    }

    /// The latest snapshot, which may be newer than `current()`.
    pub fn latest(&self) -> CustomerSnapshot {
        self.receiver.borrow().clone()
    }

    /// Run the filter engine over `current()`.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Arc<Customer>> {
        filter::filter(self.current.as_slice(), criteria)
    }

    /// Wait for the next change, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<CustomerSnapshot> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> CustomerWatchStream {
        CustomerWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one per store mutation
/// (intermediate snapshots may be skipped under fast writes).
pub struct CustomerWatchStream {
    inner: WatchStream<CustomerSnapshot>,
}

impl Stream for CustomerWatchStream {
    type Item = CustomerSnapshot;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // WatchStream is Unpin when the item is, and an Arc always is.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

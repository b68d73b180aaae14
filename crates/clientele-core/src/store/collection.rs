// ── Ordered reactive collection ──
//
// Insertion-ordered storage with push-based change notification via
// `watch` channels. Order is part of the data: list views render the
// snapshot as-is, so every in-place edit keeps the item's position.

use std::sync::Arc;

use tokio::sync::watch;

/// Anything stored in an [`OrderedCollection`] is addressed by a key.
pub(crate) trait Keyed {
    type Key: PartialEq + Copy;

    fn key(&self) -> Self::Key;
}

/// A reactive, insertion-ordered collection for a single entity type.
///
/// Every write runs inside the snapshot channel's write lock, so a
/// read-modify-write never interleaves with another writer. Readers
/// only ever see complete snapshots.
pub(crate) struct OrderedCollection<T: Keyed + Send + Sync + 'static> {
    /// Version counter, bumped on every effective mutation.
    version: watch::Sender<u64>,

    /// Ordered snapshot handed to subscribers.
    snapshot: watch::Sender<Arc<Vec<Arc<T>>>>,
}

impl<T: Keyed + Send + Sync + 'static> OrderedCollection<T> {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { version, snapshot }
    }

    /// Replace the whole contents, keeping the incoming order.
    pub(crate) fn replace_all(&self, items: Vec<T>) {
        let items: Vec<Arc<T>> = items.into_iter().map(Arc::new).collect();
        self.modify(move |current| {
            *current = items;
            true
        });
    }

    /// Replace in place if the key exists, append otherwise.
    /// Returns `true` if the key was new.
    pub(crate) fn upsert(&self, item: T) -> bool {
        let mut is_new = false;
        let key = item.key();
        let item = Arc::new(item);
        self.modify(|current| {
            match current.iter_mut().find(|existing| existing.key() == key) {
                Some(slot) => *slot = item,
                None => {
                    current.push(item);
                    is_new = true;
                }
            }
            true
        });
        is_new
    }

    /// Derive a new version of one item from its current value.
    ///
    /// `f` returns `None` to leave the item (and the version) unchanged.
    pub(crate) fn update<F>(&self, key: T::Key, f: F) -> Option<Arc<T>>
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let mut updated = None;
        self.modify(|current| {
            let Some(slot) = current.iter_mut().find(|e| e.key() == key) else {
                return false;
            };
            let Some(next) = f(&**slot) else {
                return false;
            };
            let next = Arc::new(next);
            *slot = Arc::clone(&next);
            updated = Some(next);
            true
        });
        updated
    }

    /// Remove by key, returning the removed item.
    pub(crate) fn remove(&self, key: T::Key) -> Option<Arc<T>> {
        let mut removed = None;
        self.modify(|current| {
            let Some(pos) = current.iter().position(|e| e.key() == key) else {
                return false;
            };
            removed = Some(current.remove(pos));
            true
        });
        removed
    }

    pub(crate) fn get(&self, key: T::Key) -> Option<Arc<T>> {
        self.find(|e| e.key() == key)
    }

    /// First item satisfying `pred`, in collection order.
    pub(crate) fn find(&self, pred: impl Fn(&T) -> bool) -> Option<Arc<T>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|e| pred(e))
            .map(Arc::clone)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Arc<Vec<Arc<T>>> {
        self.snapshot.borrow().clone()
    }

    /// Subscribe to snapshot changes via a `watch::Receiver`.
    pub(crate) fn subscribe(&self) -> watch::Receiver<Arc<Vec<Arc<T>>>> {
        self.snapshot.subscribe()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Apply `f` to a working copy of the item list and publish it if
    /// `f` reports a change.
    fn modify(&self, f: impl FnOnce(&mut Vec<Arc<T>>) -> bool) -> bool {
        // `send_if_modified` updates even with zero receivers.
        let changed = self.snapshot.send_if_modified(|snap| {
            let mut working: Vec<Arc<T>> = snap.as_ref().clone();
            if f(&mut working) {
                *snap = Arc::new(working);
                true
            } else {
                false
            }
        });
        if changed {
            self.version.send_modify(|v| *v += 1);
        }
        changed
    }
}

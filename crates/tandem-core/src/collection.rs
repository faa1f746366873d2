//! Notification boundary between collections and their observers.
//!
//! Any ordered collection that implements [`ObservableCollection`] can take
//! part in synchronization. The trait covers the structural operations a
//! synchronizer needs plus explicit subscription management.
//!
//! # Invariants
//!
//! - Notifications are delivered synchronously on the mutating thread
//! - A suspended subscription receives nothing until resumed
//! - Listener errors propagate back out of the mutating call

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::{change::CollectionChange, error::SyncError};

/// Process-unique identity of a collection.
///
/// Used to tell which collection raised a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionId(u64);

impl CollectionId {
    /// Allocate a fresh identity.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collection#{}", self.0)
    }
}

/// Handle for one listener registration on one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Receiver of structural change notifications.
pub trait ChangeListener<T>: Send + Sync {
    /// Called after `sender` was mutated.
    ///
    /// # Errors
    ///
    /// An error aborts delivery and is returned to whoever mutated `sender`.
    fn collection_changed(
        &self,
        sender: CollectionId,
        change: &CollectionChange<T>,
    ) -> Result<(), SyncError>;
}

/// An ordered collection that reports its structural changes.
pub trait ObservableCollection<T>: Send + Sync {
    /// Identity reported as the sender of notifications.
    fn id(&self) -> CollectionId;

    /// Number of elements.
    fn len(&self) -> usize;

    /// Whether the collection holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the current contents, in order.
    fn snapshot(&self) -> Vec<T>;

    /// Insert `item` at `index`.
    ///
    /// Returns `false` when the collection declined the item; no notification
    /// is raised in that case.
    fn insert(&self, index: usize, item: T) -> Result<bool, SyncError>;

    /// Remove and return the item at `index`.
    fn remove(&self, index: usize) -> Result<T, SyncError>;

    /// Replace the whole contents, raising a single reset notification.
    ///
    /// Items the collection declines are dropped.
    fn replace_all(&self, items: Vec<T>) -> Result<(), SyncError>;

    /// Register a listener.
    fn subscribe(&self, listener: Arc<dyn ChangeListener<T>>) -> SubscriptionId;

    /// Remove a registration. Returns `false` if it was not registered.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    /// Stop delivering notifications to `id` until [`resume`](Self::resume).
    ///
    /// Suspensions nest: delivery restarts once every `suspend` has been
    /// matched by a `resume`.
    fn suspend(&self, id: SubscriptionId);

    /// Undo one suspension of `id`.
    fn resume(&self, id: SubscriptionId);
}

/// Scoped suspension of one subscription.
///
/// The subscription is resumed when the guard drops, including on early
/// return through `?`.
pub struct Suspended<'a, T> {
    collection: &'a dyn ObservableCollection<T>,
    id: SubscriptionId,
}

impl<'a, T> Suspended<'a, T> {
    /// Suspend `id` on `collection` for the lifetime of the guard.
    pub fn new(collection: &'a dyn ObservableCollection<T>, id: SubscriptionId) -> Self {
        collection.suspend(id);
        Self { collection, id }
    }
}

impl<T> Drop for Suspended<'_, T> {
    fn drop(&mut self) {
        self.collection.resume(self.id);
    }
}

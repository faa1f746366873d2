//! Shared observable list.
//!
//! [`ObservableList`] is meant to live behind an `Arc`: its owner mutates it
//! directly, and a synchronizer observes and mutates it in reaction.
//!
//! ## Delivery
//!
//! Every mutation takes the item lock, applies the change, builds the
//! notification, releases the lock, and only then calls listeners. Listeners
//! are therefore free to read or mutate the list they are notified about.
//!
//! ## Admission
//!
//! A list built with [`ObservableList::with_admission`] silently declines
//! items its policy rejects. This is how a selection that may only contain
//! selectable items vetoes foreign elements. A length cap set with
//! [`ObservableList::with_max_len`] declines items the same way once the list
//! is full.

use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use parking_lot::Mutex;

use crate::{
    change::CollectionChange,
    collection::{ChangeListener, CollectionId, ObservableCollection, SubscriptionId},
    error::SyncError,
};

/// Decides which items a list accepts.
pub trait AdmissionPolicy<T>: Send + Sync {
    /// Whether `item` may become a member.
    fn admits(&self, item: &T) -> bool;
}

impl<T, F> AdmissionPolicy<T> for F
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn admits(&self, item: &T) -> bool {
        self(item)
    }
}

struct Registration<T> {
    id: SubscriptionId,
    listener: Arc<dyn ChangeListener<T>>,
    /// Outstanding suspensions; delivery happens only at zero.
    suspended: u32,
}

/// Ordered, observable, interior-mutable list.
pub struct ObservableList<T> {
    id: CollectionId,
    items: Mutex<Vec<T>>,
    listeners: Mutex<Vec<Registration<T>>>,
    next_subscription: AtomicU64,
    admission: Option<Box<dyn AdmissionPolicy<T>>>,
    max_len: Option<usize>,
}

impl<T> ObservableList<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create an empty list that accepts every item.
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create a list holding `items`.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            id: CollectionId::next(),
            items: Mutex::new(items),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            admission: None,
            max_len: None,
        }
    }

    /// Create an empty list that only accepts items `policy` admits.
    pub fn with_admission(policy: impl AdmissionPolicy<T> + 'static) -> Self {
        Self { admission: Some(Box::new(policy)), ..Self::new() }
    }

    /// Decline items that would grow the list past `max_len`.
    #[must_use]
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    /// Length cap, if any.
    pub fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    /// How many more items fit next to `len` existing ones.
    fn room(&self, len: usize) -> usize {
        self.max_len.map_or(usize::MAX, |max| max.saturating_sub(len))
    }

    /// Identity reported as the sender of this list's notifications.
    pub fn id(&self) -> CollectionId {
        self.id
    }

    /// Whether this list would accept `item`.
    pub fn admits(&self, item: &T) -> bool {
        self.admission.as_ref().is_none_or(|policy| policy.admits(item))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<T> {
        self.items.lock().get(index).cloned()
    }

    /// Copy of the contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }

    /// Number of active (not suspended) listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().iter().filter(|r| r.suspended == 0).count()
    }

    /// Append `item`. Returns `false` if the admission policy declined it
    /// or the list is full.
    pub fn push(&self, item: T) -> Result<bool, SyncError> {
        if !self.admits(&item) {
            return Ok(false);
        }

        let change = {
            let mut items = self.items.lock();
            let index = items.len();
            if self.room(index) == 0 {
                return Ok(false);
            }
            items.push(item.clone());
            CollectionChange::added(index, vec![item])
        };

        self.notify(&change)?;
        Ok(true)
    }

    /// Insert `item` at `index`. Returns `false` if it was declined.
    pub fn insert(&self, index: usize, item: T) -> Result<bool, SyncError> {
        self.insert_many(index, vec![item]).map(|count| count > 0)
    }

    /// Insert several items at `index` as one notification.
    ///
    /// Declined items are skipped; the rest stay contiguous. Items past the
    /// length cap are dropped from the end. Returns how many were inserted.
    pub fn insert_many(&self, index: usize, items: Vec<T>) -> Result<usize, SyncError> {
        let change = {
            let mut current = self.items.lock();
            if index > current.len() {
                return Err(SyncError::IndexOutOfRange { index, len: current.len() });
            }

            let admitted: Vec<T> = items
                .into_iter()
                .filter(|item| self.admits(item))
                .take(self.room(current.len()))
                .collect();
            if admitted.is_empty() {
                return Ok(0);
            }

            current.splice(index..index, admitted.iter().cloned());
            CollectionChange::added(index, admitted)
        };

        let count = change.new_items.len();
        self.notify(&change)?;
        Ok(count)
    }

    /// Remove and return the item at `index`.
    pub fn remove(&self, index: usize) -> Result<T, SyncError> {
        let mut removed = self.remove_range(index, 1)?;
        removed.pop().ok_or(SyncError::IndexOutOfRange { index, len: 0 })
    }

    /// Remove `count` items starting at `index` as one notification.
    pub fn remove_range(&self, index: usize, count: usize) -> Result<Vec<T>, SyncError> {
        let change = {
            let mut items = self.items.lock();
            let end = index.saturating_add(count);
            if end > items.len() || index >= items.len() {
                return Err(SyncError::IndexOutOfRange { index, len: items.len() });
            }

            let removed: Vec<T> = items.drain(index..end).collect();
            CollectionChange::removed(index, removed)
        };

        self.notify(&change)?;
        Ok(change.old_items)
    }

    /// Move the item at `from` so that it ends up at `to`.
    pub fn move_item(&self, from: usize, to: usize) -> Result<(), SyncError> {
        let change = {
            let mut items = self.items.lock();
            let len = items.len();
            if from >= len {
                return Err(SyncError::IndexOutOfRange { index: from, len });
            }
            if to >= len {
                return Err(SyncError::IndexOutOfRange { index: to, len });
            }
            if from == to {
                return Ok(());
            }

            let item = items.remove(from);
            items.insert(to, item.clone());
            CollectionChange::moved(from, to, item)
        };

        self.notify(&change)
    }

    /// Overwrite the item at `index`, returning the previous one.
    ///
    /// Returns `None` and leaves the list untouched if `item` is declined.
    pub fn replace(&self, index: usize, item: T) -> Result<Option<T>, SyncError> {
        let change = {
            let mut items = self.items.lock();
            let len = items.len();
            let Some(slot) = items.get_mut(index) else {
                return Err(SyncError::IndexOutOfRange { index, len });
            };
            if !self.admits(&item) {
                return Ok(None);
            }

            let old = std::mem::replace(slot, item.clone());
            CollectionChange::replaced(index, old, item)
        };

        self.notify(&change)?;
        Ok(change.old_items.into_iter().next())
    }

    /// Remove everything, raising a reset.
    pub fn clear(&self) -> Result<(), SyncError> {
        self.items.lock().clear();
        self.notify(&CollectionChange::reset())
    }

    /// Replace the contents wholesale, raising a reset.
    ///
    /// Declined items are dropped; the rest keep their relative order, cut at
    /// the length cap.
    pub fn replace_all(&self, items: Vec<T>) -> Result<(), SyncError> {
        let admitted: Vec<T> =
            items.into_iter().filter(|item| self.admits(item)).take(self.room(0)).collect();
        *self.items.lock() = admitted;
        self.notify(&CollectionChange::reset())
    }

    /// Register a listener.
    pub fn subscribe(&self, listener: Arc<dyn ChangeListener<T>>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push(Registration { id, listener, suspended: 0 });
        id
    }

    /// Remove a listener registration.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|r| r.id != id);
        listeners.len() != before
    }

    /// Stop delivering to `id` until resumed. Suspensions nest.
    pub fn suspend(&self, id: SubscriptionId) {
        if let Some(registration) = self.listeners.lock().iter_mut().find(|r| r.id == id) {
            registration.suspended += 1;
        }
    }

    /// Undo one [`suspend`](Self::suspend) of `id`.
    pub fn resume(&self, id: SubscriptionId) {
        if let Some(registration) = self.listeners.lock().iter_mut().find(|r| r.id == id) {
            registration.suspended = registration.suspended.saturating_sub(1);
        }
    }

    /// Deliver `change` to every active listener, in subscription order.
    ///
    /// Runs with no lock held.
    fn notify(&self, change: &CollectionChange<T>) -> Result<(), SyncError> {
        let listeners: Vec<Arc<dyn ChangeListener<T>>> = self
            .listeners
            .lock()
            .iter()
            .filter(|r| r.suspended == 0)
            .map(|r| Arc::clone(&r.listener))
            .collect();

        tracing::trace!(
            collection = %self.id,
            kind = ?change.kind,
            listeners = listeners.len(),
            "collection changed"
        );

        for listener in listeners {
            listener.collection_changed(self.id, change)?;
        }

        Ok(())
    }
}

impl<T> ObservableList<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Whether `item` is a member.
    pub fn contains(&self, item: &T) -> bool {
        self.items.lock().contains(item)
    }

    /// Index of the first occurrence of `item`.
    pub fn position(&self, item: &T) -> Option<usize> {
        self.items.lock().iter().position(|candidate| candidate == item)
    }
}

impl<T> Default for ObservableList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObservableList<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("id", &self.id)
            .field("items", &*self.items.lock())
            .field("listeners", &self.listeners.lock().len())
            .field("admission", &self.admission.is_some())
            .field("max_len", &self.max_len)
            .finish()
    }
}

impl<T> ObservableCollection<T> for ObservableList<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn id(&self) -> CollectionId {
        self.id
    }

    fn len(&self) -> usize {
        Self::len(self)
    }

    fn snapshot(&self) -> Vec<T> {
        Self::snapshot(self)
    }

    fn insert(&self, index: usize, item: T) -> Result<bool, SyncError> {
        Self::insert(self, index, item)
    }

    fn remove(&self, index: usize) -> Result<T, SyncError> {
        Self::remove(self, index)
    }

    fn replace_all(&self, items: Vec<T>) -> Result<(), SyncError> {
        Self::replace_all(self, items)
    }

    fn subscribe(&self, listener: Arc<dyn ChangeListener<T>>) -> SubscriptionId {
        Self::subscribe(self, listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        Self::unsubscribe(self, id)
    }

    fn suspend(&self, id: SubscriptionId) {
        Self::suspend(self, id);
    }

    fn resume(&self, id: SubscriptionId) {
        Self::resume(self, id);
    }
}

//! Two-collection synchronizer.
//!
//! The `Synchronizer` subscribes to a master and a target collection and
//! mirrors every structural change from one onto the other through an
//! [`ItemConverter`].
//!
//! ## Responsibilities
//!
//! - Start-up: overwrite target from master, then correct master from target
//!   if the target vetoed some elements
//! - Itemized changes: translate add/remove/move/replace by index
//! - Resets: rerun the start-up overwrite from the side that reset
//! - Loop prevention: suspend only the destination's subscription, only for
//!   the propagated write
//!
//! ## Locking
//!
//! All handling and `start`/`stop` serialize on one re-entrant lock per
//! instance. A host listener on the destination may mutate the other
//! collection from inside a propagated write; that nested change is handled
//! on the same thread instead of deadlocking.
//!
//! ## Failure
//!
//! Propagation is best-effort and non-transactional. A failing conversion
//! aborts the cycle and leaves items already applied in place; the error is
//! returned from the mutation that raised the notification. Bulk overwrites
//! convert every element before touching the destination.

use std::{
    cell::RefCell,
    fmt,
    sync::{Arc, Weak},
};

use parking_lot::ReentrantMutex;

use crate::{
    change::{ChangeKind, CollectionChange},
    collection::{ChangeListener, CollectionId, ObservableCollection, SubscriptionId, Suspended},
    convert::{ConversionError, IdentityConverter, ItemConverter},
    error::SyncError,
};

/// What the synchronizer is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    /// Not writing to either collection.
    Idle,
    /// Writing to master; master's subscription is suspended.
    PropagatingToMaster,
    /// Writing to target; target's subscription is suspended.
    PropagatingToTarget,
}

/// Subscription handles held while running.
#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    master: SubscriptionId,
    target: SubscriptionId,
}

/// Mutable state, only touched with the instance lock held.
#[derive(Debug)]
struct SyncState {
    subscriptions: Option<Subscriptions>,
    phase: SyncPhase,
}

/// Which collection a bulk overwrite writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Master,
    Target,
}

struct Shared<M, T, C> {
    master: Arc<dyn ObservableCollection<M>>,
    target: Arc<dyn ObservableCollection<T>>,
    converter: C,
    state: ReentrantMutex<RefCell<SyncState>>,
}

/// Keeps a master and a target collection element-wise equal.
///
/// # Invariants
///
/// - After every completed cycle, `convert(master[i]) == target[i]` for all
///   `i`, unless the target vetoed elements, in which case master was
///   corrected to `convert_back(target)`
/// - Changes are applied in the order their notifications arrive
/// - After [`stop`](Self::stop) nothing propagates
///
/// # Ownership
///
/// The synchronizer shares ownership of both collections: it keeps them
/// alive for as long as it lives, but never owns them exclusively. The
/// listeners it registers hold only a `Weak` reference back to it, so the
/// collections do not keep the synchronizer alive, and dropping it releases
/// both its references and its subscriptions.
///
/// # Type Parameters
///
/// - `M`: master element type
/// - `T`: target element type
/// - `C`: conversion contract between them
pub struct Synchronizer<M, T, C = IdentityConverter> {
    shared: Arc<Shared<M, T, C>>,
}

impl<T> Synchronizer<T, T, IdentityConverter>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Synchronize two collections of the same element type unchanged.
    pub fn new(
        master: Arc<dyn ObservableCollection<T>>,
        target: Arc<dyn ObservableCollection<T>>,
    ) -> Self {
        Self::with_converter(master, target, IdentityConverter)
    }
}

impl<M, T, C> Synchronizer<M, T, C>
where
    M: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    C: ItemConverter<M, T> + 'static,
{
    /// Synchronize `master` and `target` through `converter`.
    ///
    /// Neither collection is touched until [`start`](Self::start).
    pub fn with_converter(
        master: Arc<dyn ObservableCollection<M>>,
        target: Arc<dyn ObservableCollection<T>>,
        converter: C,
    ) -> Self {
        let state = SyncState { subscriptions: None, phase: SyncPhase::Idle };
        Self {
            shared: Arc::new(Shared {
                master,
                target,
                converter,
                state: ReentrantMutex::new(RefCell::new(state)),
            }),
        }
    }

    /// Subscribe to both collections and bring them into agreement.
    ///
    /// Target is overwritten from master. If the result does not convert back
    /// to master (the target declined some elements), master is overwritten
    /// from target. Starting a running synchronizer only reconciles again.
    ///
    /// # Errors
    ///
    /// Returns the first conversion or listener error. The synchronizer stays
    /// subscribed.
    pub fn start(&self) -> Result<(), SyncError> {
        let shared = &self.shared;
        let guard = shared.state.lock();

        let running = guard.borrow().subscriptions.is_some();
        if !running {
            let master_listener: Arc<dyn ChangeListener<M>> =
                Arc::new(MasterListener(Arc::downgrade(shared)));
            let target_listener: Arc<dyn ChangeListener<T>> =
                Arc::new(TargetListener(Arc::downgrade(shared)));

            let subscriptions = Subscriptions {
                master: shared.master.subscribe(master_listener),
                target: shared.target.subscribe(target_listener),
            };
            guard.borrow_mut().subscriptions = Some(subscriptions);

            tracing::info!(
                master = %shared.master.id(),
                target = %shared.target.id(),
                "synchronization started"
            );
        }

        shared.reconcile(&guard, Side::Target)
    }

    /// Unsubscribe from both collections.
    ///
    /// Idempotent: stopping a stopped or never-started synchronizer does
    /// nothing.
    pub fn stop(&self) {
        self.shared.unsubscribe();
    }

    /// Whether the synchronizer is subscribed.
    pub fn is_running(&self) -> bool {
        self.shared.state.lock().borrow().subscriptions.is_some()
    }

    /// Current propagation phase.
    pub fn phase(&self) -> SyncPhase {
        self.shared.state.lock().borrow().phase
    }

    /// The master collection.
    pub fn master(&self) -> &Arc<dyn ObservableCollection<M>> {
        &self.shared.master
    }

    /// The target collection.
    pub fn target(&self) -> &Arc<dyn ObservableCollection<T>> {
        &self.shared.target
    }

    /// Whether `convert_back(target)` equals master positionally.
    pub fn is_converged(&self) -> Result<bool, SyncError> {
        let _guard = self.shared.state.lock();
        self.shared.is_converged()
    }
}

impl<M, T, C> Shared<M, T, C>
where
    M: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    C: ItemConverter<M, T> + 'static,
{
    fn on_master_changed(
        &self,
        sender: CollectionId,
        change: &CollectionChange<M>,
    ) -> Result<(), SyncError> {
        if sender != self.master.id() {
            return Ok(());
        }

        let guard = self.state.lock();
        let subscriptions = guard.borrow().subscriptions;
        let Some(subscriptions) = subscriptions else {
            return Ok(());
        };

        change.validate()?;
        tracing::debug!(kind = ?change.kind, from = "master", "propagating change");

        if change.kind == ChangeKind::Reset {
            return self.reconcile(&guard, Side::Target);
        }

        self.write(
            &guard,
            SyncPhase::PropagatingToTarget,
            Suspended::new(&*self.target, subscriptions.target),
            || apply_itemized(&*self.target, change, |item| self.converter.convert(item)),
        )
    }

    fn on_target_changed(
        &self,
        sender: CollectionId,
        change: &CollectionChange<T>,
    ) -> Result<(), SyncError> {
        if sender != self.target.id() {
            return Ok(());
        }

        let guard = self.state.lock();
        let subscriptions = guard.borrow().subscriptions;
        let Some(subscriptions) = subscriptions else {
            return Ok(());
        };

        change.validate()?;
        tracing::debug!(kind = ?change.kind, from = "target", "propagating change");

        if change.kind == ChangeKind::Reset {
            return self.reconcile(&guard, Side::Master);
        }

        self.write(
            &guard,
            SyncPhase::PropagatingToMaster,
            Suspended::new(&*self.master, subscriptions.master),
            || apply_itemized(&*self.master, change, |item| self.converter.convert_back(item)),
        )
    }

    /// Overwrite `toward` from the other side, then correct in reverse if
    /// the two still disagree.
    fn reconcile(&self, state: &RefCell<SyncState>, toward: Side) -> Result<(), SyncError> {
        self.overwrite(state, toward)?;

        if !self.is_converged()? {
            let back = match toward {
                Side::Target => Side::Master,
                Side::Master => Side::Target,
            };
            tracing::warn!(
                master_len = self.master.len(),
                target_len = self.target.len(),
                corrected = ?back,
                "collections disagree after overwrite, correcting"
            );
            self.overwrite(state, back)?;
        }

        Ok(())
    }

    /// Replace the contents of `side` with the converted contents of the
    /// other side.
    fn overwrite(&self, state: &RefCell<SyncState>, side: Side) -> Result<(), SyncError> {
        let subscriptions = state.borrow().subscriptions;

        match side {
            Side::Target => {
                let items = self
                    .master
                    .snapshot()
                    .iter()
                    .map(|item| self.converter.convert(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let suspended =
                    subscriptions.map(|s| Suspended::new(&*self.target, s.target));
                self.write(state, SyncPhase::PropagatingToTarget, suspended, || {
                    self.target.replace_all(items)
                })
            },
            Side::Master => {
                let items = self
                    .target
                    .snapshot()
                    .iter()
                    .map(|item| self.converter.convert_back(item))
                    .collect::<Result<Vec<_>, _>>()?;
                let suspended =
                    subscriptions.map(|s| Suspended::new(&*self.master, s.master));
                self.write(state, SyncPhase::PropagatingToMaster, suspended, || {
                    self.master.replace_all(items)
                })
            },
        }
    }

    /// Run `write` in `phase` while `suspended` is held.
    ///
    /// The previous phase is restored afterward, also on error.
    fn write<G>(
        &self,
        state: &RefCell<SyncState>,
        phase: SyncPhase,
        suspended: G,
        write: impl FnOnce() -> Result<(), SyncError>,
    ) -> Result<(), SyncError> {
        let previous = std::mem::replace(&mut state.borrow_mut().phase, phase);
        let result = write();
        drop(suspended);
        state.borrow_mut().phase = previous;
        result
    }

    fn is_converged(&self) -> Result<bool, SyncError> {
        let master = self.master.snapshot();
        let target = self.target.snapshot();
        if master.len() != target.len() {
            return Ok(false);
        }

        for (expected, item) in master.iter().zip(&target) {
            if self.converter.convert_back(item)? != *expected {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

/// Apply an itemized change to `dest`.
fn apply_itemized<S, D>(
    dest: &dyn ObservableCollection<D>,
    change: &CollectionChange<S>,
    convert: impl Fn(&S) -> Result<D, ConversionError>,
) -> Result<(), SyncError> {
    match change.kind {
        ChangeKind::Add => add_items(dest, change, &convert),
        ChangeKind::Remove => remove_items(dest, change),
        ChangeKind::Move | ChangeKind::Replace => {
            remove_items(dest, change)?;
            add_items(dest, change, &convert)
        },
        ChangeKind::Reset => Err(SyncError::MalformedChange {
            kind: ChangeKind::Reset,
            reason: "reset carries no itemized delta".to_string(),
        }),
    }
}

/// Insert converted new items at the notified index, appending when the
/// destination is shorter.
fn add_items<S, D>(
    dest: &dyn ObservableCollection<D>,
    change: &CollectionChange<S>,
    convert: &impl Fn(&S) -> Result<D, ConversionError>,
) -> Result<(), SyncError> {
    let Some(start) = change.new_starting_index else {
        return Ok(());
    };

    for (offset, item) in change.new_items.iter().enumerate() {
        let converted = convert(item)?;
        let index = (start + offset).min(dest.len());
        tracing::trace!(index, "insert");
        dest.insert(index, converted)?;
    }

    Ok(())
}

/// Remove at the notified index once per removed item, skipping when the
/// destination is already too short.
fn remove_items<S, D>(
    dest: &dyn ObservableCollection<D>,
    change: &CollectionChange<S>,
) -> Result<(), SyncError> {
    let Some(start) = change.old_starting_index else {
        return Ok(());
    };

    for _ in &change.old_items {
        if dest.len() > start {
            tracing::trace!(index = start, "remove");
            dest.remove(start)?;
        }
    }

    Ok(())
}

impl<M, T, C> Shared<M, T, C> {
    /// Drop both subscriptions if held.
    fn unsubscribe(&self) {
        let guard = self.state.lock();

        let subscriptions = guard.borrow_mut().subscriptions.take();
        if let Some(subscriptions) = subscriptions {
            self.master.unsubscribe(subscriptions.master);
            self.target.unsubscribe(subscriptions.target);

            tracing::info!(
                master = %self.master.id(),
                target = %self.target.id(),
                "synchronization stopped"
            );
        }
    }
}

struct MasterListener<M, T, C>(Weak<Shared<M, T, C>>);

impl<M, T, C> ChangeListener<M> for MasterListener<M, T, C>
where
    M: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    C: ItemConverter<M, T> + 'static,
{
    fn collection_changed(
        &self,
        sender: CollectionId,
        change: &CollectionChange<M>,
    ) -> Result<(), SyncError> {
        match self.0.upgrade() {
            Some(shared) => shared.on_master_changed(sender, change),
            None => Ok(()),
        }
    }
}

struct TargetListener<M, T, C>(Weak<Shared<M, T, C>>);

impl<M, T, C> ChangeListener<T> for TargetListener<M, T, C>
where
    M: Clone + PartialEq + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
    C: ItemConverter<M, T> + 'static,
{
    fn collection_changed(
        &self,
        sender: CollectionId,
        change: &CollectionChange<T>,
    ) -> Result<(), SyncError> {
        match self.0.upgrade() {
            Some(shared) => shared.on_target_changed(sender, change),
            None => Ok(()),
        }
    }
}

impl<M, T, C> Drop for Synchronizer<M, T, C> {
    fn drop(&mut self) {
        self.shared.unsubscribe();
    }
}

impl<M, T, C> fmt::Debug for Synchronizer<M, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.shared.state.lock();
        let state = guard.borrow();
        f.debug_struct("Synchronizer")
            .field("master", &self.shared.master.id())
            .field("target", &self.shared.target.id())
            .field("running", &state.subscriptions.is_some())
            .field("phase", &state.phase)
            .finish()
    }
}

//! Real system wrapper that mirrors `ModelWorld`'s interface.
//!
//! Two [`ObservableList`]s joined by a [`Synchronizer`]. Operations are
//! applied through the public list API only, so every propagation goes
//! through actual notifications.

use std::sync::Arc;

use tandem_core::{ObservableCollection, ObservableList, SyncError, Synchronizer};

use crate::model::{
    ModelValue, ObservableState, Operation, OperationError, OperationResult, admitted_by_target,
};

/// Synchronized pair of real lists.
#[derive(Debug)]
pub struct RealWorld {
    master: Arc<ObservableList<ModelValue>>,
    target: Arc<ObservableList<ModelValue>>,
    synchronizer: Synchronizer<ModelValue, ModelValue>,
}

impl RealWorld {
    /// Create and start a synchronizer over two empty lists. With `veto`,
    /// the target admits only values accepted by [`admitted_by_target`].
    ///
    /// # Errors
    ///
    /// Propagates a failing initial reconciliation.
    pub fn new(veto: bool) -> Result<Self, SyncError> {
        let master = Arc::new(ObservableList::new());
        let target = Arc::new(if veto {
            ObservableList::with_admission(|value: &ModelValue| admitted_by_target(*value))
        } else {
            ObservableList::new()
        });

        let synchronizer = Synchronizer::new(
            Arc::clone(&master) as Arc<dyn ObservableCollection<ModelValue>>,
            Arc::clone(&target) as Arc<dyn ObservableCollection<ModelValue>>,
        );
        synchronizer.start()?;

        Ok(Self { master, target, synchronizer })
    }

    /// The synchronizer under test.
    pub fn synchronizer(&self) -> &Synchronizer<ModelValue, ModelValue> {
        &self.synchronizer
    }

    /// Apply an operation and classify the outcome.
    pub fn apply(&self, op: &Operation) -> OperationResult {
        let outcome = match op {
            Operation::PushMaster { value } => self.master.push(*value).map(drop),
            Operation::PushTarget { value } => self.target.push(*value).map(drop),
            Operation::InsertMaster { index, value } => {
                self.master.insert(usize::from(*index), *value).map(drop)
            },
            Operation::InsertTarget { index, value } => {
                self.target.insert(usize::from(*index), *value).map(drop)
            },
            Operation::RemoveMaster { index } => self.master.remove(usize::from(*index)).map(drop),
            Operation::RemoveTarget { index } => self.target.remove(usize::from(*index)).map(drop),
            Operation::MoveMaster { from, to } => {
                self.master.move_item(usize::from(*from), usize::from(*to))
            },
            Operation::MoveTarget { from, to } => {
                self.target.move_item(usize::from(*from), usize::from(*to))
            },
            Operation::ReplaceMaster { index, value } => {
                self.master.replace(usize::from(*index), *value).map(drop)
            },
            Operation::ReplaceTarget { index, value } => {
                self.target.replace(usize::from(*index), *value).map(drop)
            },
            Operation::ClearMaster => self.master.clear(),
            Operation::ClearTarget => self.target.clear(),
            Operation::ResetMaster { values } => self.master.replace_all(values.clone()),
            Operation::ResetTarget { values } => self.target.replace_all(values.clone()),
            Operation::Stop => {
                self.synchronizer.stop();
                Ok(())
            },
            Operation::Start => self.synchronizer.start(),
        };

        match outcome {
            Ok(()) => OperationResult::Ok,
            Err(SyncError::IndexOutOfRange { .. }) => {
                OperationResult::Error(OperationError::IndexOutOfRange)
            },
            Err(_) => OperationResult::Error(OperationError::Propagation),
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            master: self.master.snapshot(),
            target: self.target.snapshot(),
            running: self.synchronizer.is_running(),
        }
    }
}

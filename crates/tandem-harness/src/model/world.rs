//! Model world - two vectors and a running flag.
//!
//! The world is the oracle against which the real synchronizer is verified.
//! Every propagation the real system performs through notifications is
//! spelled out here as a direct edit of the other vector.

use super::operation::{ModelValue, Operation, OperationError, OperationResult};

/// Admission policy of the target when the world is built with a veto.
///
/// Multiples of four are declined.
pub fn admitted_by_target(value: ModelValue) -> bool {
    value % 4 != 0
}

/// Observable state for oracle comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservableState {
    /// Master contents.
    pub master: Vec<ModelValue>,
    /// Target contents.
    pub target: Vec<ModelValue>,
    /// Whether changes propagate.
    pub running: bool,
}

/// Model world - the reference implementation.
///
/// Starts running over two empty collections.
#[derive(Debug, Clone)]
pub struct ModelWorld {
    master: Vec<ModelValue>,
    target: Vec<ModelValue>,
    veto: bool,
    running: bool,
}

impl ModelWorld {
    /// Create a running world. With `veto`, the target only admits values
    /// accepted by [`admitted_by_target`].
    pub fn new(veto: bool) -> Self {
        Self { master: Vec::new(), target: Vec::new(), veto, running: true }
    }

    /// Whether changes currently propagate.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether both sides hold the same items in the same order.
    pub fn is_converged(&self) -> bool {
        self.master == self.target
    }

    /// Apply an operation and return the result.
    ///
    /// The result should match the real implementation's result.
    pub fn apply(&mut self, op: &Operation) -> OperationResult {
        match op {
            Operation::PushMaster { value } => self.insert_master(self.master.len(), *value),
            Operation::PushTarget { value } => self.insert_target(self.target.len(), *value),
            Operation::InsertMaster { index, value } => {
                self.insert_master(usize::from(*index), *value)
            },
            Operation::InsertTarget { index, value } => {
                self.insert_target(usize::from(*index), *value)
            },
            Operation::RemoveMaster { index } => self.remove_master(usize::from(*index)),
            Operation::RemoveTarget { index } => self.remove_target(usize::from(*index)),
            Operation::MoveMaster { from, to } => {
                self.move_master(usize::from(*from), usize::from(*to))
            },
            Operation::MoveTarget { from, to } => {
                self.move_target(usize::from(*from), usize::from(*to))
            },
            Operation::ReplaceMaster { index, value } => {
                self.replace_master(usize::from(*index), *value)
            },
            Operation::ReplaceTarget { index, value } => {
                self.replace_target(usize::from(*index), *value)
            },
            Operation::ClearMaster => self.reset_master(Vec::new()),
            Operation::ClearTarget => self.reset_target(Vec::new()),
            Operation::ResetMaster { values } => self.reset_master(values.clone()),
            Operation::ResetTarget { values } => self.reset_target(values.clone()),
            Operation::Stop => {
                self.running = false;
                OperationResult::Ok
            },
            Operation::Start => {
                self.running = true;
                self.reconcile();
                OperationResult::Ok
            },
        }
    }

    /// Extract observable state for comparison.
    pub fn observable_state(&self) -> ObservableState {
        ObservableState {
            master: self.master.clone(),
            target: self.target.clone(),
            running: self.running,
        }
    }

    fn admits(&self, value: ModelValue) -> bool {
        !self.veto || admitted_by_target(value)
    }

    /// Insert into target the way a propagated add does: append when the
    /// index overshoots, drop silently when declined.
    fn propagate_insert_to_target(&mut self, index: usize, value: ModelValue) {
        if self.admits(value) {
            let index = index.min(self.target.len());
            self.target.insert(index, value);
        }
    }

    fn propagate_insert_to_master(&mut self, index: usize, value: ModelValue) {
        let index = index.min(self.master.len());
        self.master.insert(index, value);
    }

    /// Overwrite target from master, then master from target if the target
    /// declined anything.
    fn reconcile(&mut self) {
        self.target = self.master.iter().copied().filter(|v| self.admits(*v)).collect();
        if self.target != self.master {
            self.master = self.target.clone();
        }
    }

    fn insert_master(&mut self, index: usize, value: ModelValue) -> OperationResult {
        if index > self.master.len() {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }

        self.master.insert(index, value);
        if self.running {
            self.propagate_insert_to_target(index, value);
        }
        OperationResult::Ok
    }

    fn insert_target(&mut self, index: usize, value: ModelValue) -> OperationResult {
        if index > self.target.len() {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }
        if !self.admits(value) {
            return OperationResult::Ok;
        }

        self.target.insert(index, value);
        if self.running {
            self.propagate_insert_to_master(index, value);
        }
        OperationResult::Ok
    }

    fn remove_master(&mut self, index: usize) -> OperationResult {
        if index >= self.master.len() {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }

        self.master.remove(index);
        if self.running && index < self.target.len() {
            self.target.remove(index);
        }
        OperationResult::Ok
    }

    fn remove_target(&mut self, index: usize) -> OperationResult {
        if index >= self.target.len() {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }

        self.target.remove(index);
        if self.running && index < self.master.len() {
            self.master.remove(index);
        }
        OperationResult::Ok
    }

    fn move_master(&mut self, from: usize, to: usize) -> OperationResult {
        let len = self.master.len();
        if from >= len || to >= len {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }
        if from == to {
            return OperationResult::Ok;
        }

        let value = self.master.remove(from);
        self.master.insert(to, value);
        if self.running {
            if from < self.target.len() {
                self.target.remove(from);
            }
            self.propagate_insert_to_target(to, value);
        }
        OperationResult::Ok
    }

    fn move_target(&mut self, from: usize, to: usize) -> OperationResult {
        let len = self.target.len();
        if from >= len || to >= len {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }
        if from == to {
            return OperationResult::Ok;
        }

        let value = self.target.remove(from);
        self.target.insert(to, value);
        if self.running {
            if from < self.master.len() {
                self.master.remove(from);
            }
            self.propagate_insert_to_master(to, value);
        }
        OperationResult::Ok
    }

    fn replace_master(&mut self, index: usize, value: ModelValue) -> OperationResult {
        let Some(slot) = self.master.get_mut(index) else {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        };

        *slot = value;
        if self.running {
            if index < self.target.len() {
                self.target.remove(index);
            }
            self.propagate_insert_to_target(index, value);
        }
        OperationResult::Ok
    }

    fn replace_target(&mut self, index: usize, value: ModelValue) -> OperationResult {
        if index >= self.target.len() {
            return OperationResult::Error(OperationError::IndexOutOfRange);
        }
        if !self.admits(value) {
            return OperationResult::Ok;
        }

        self.target[index] = value;
        if self.running {
            if index < self.master.len() {
                self.master.remove(index);
            }
            self.propagate_insert_to_master(index, value);
        }
        OperationResult::Ok
    }

    fn reset_master(&mut self, values: Vec<ModelValue>) -> OperationResult {
        self.master = values;
        if self.running {
            self.reconcile();
        }
        OperationResult::Ok
    }

    fn reset_target(&mut self, values: Vec<ModelValue>) -> OperationResult {
        self.target = values.into_iter().filter(|v| self.admits(*v)).collect();
        if self.running {
            self.master = self.target.clone();
        }
        OperationResult::Ok
    }
}

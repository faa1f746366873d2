//! Operations for model-based testing.
//!
//! Operations represent every mutation a host can make on either side of a
//! synchronizer, plus stopping and restarting it. They are generated randomly
//! by proptest (or the fuzzer) and applied to both the model and the real
//! implementation.

use arbitrary::Arbitrary;

/// Element type of both collections (kept small so duplicates are common).
pub type ModelValue = u8;

/// Position in a collection (kept small so most indices hit).
pub type ModelIndex = u8;

/// Operations that can be applied to the system.
///
/// `*Master` operations mutate the master collection directly, `*Target`
/// operations the target. Indices are not clamped: out-of-range operations
/// must fail the same way in the model and the real system.
#[derive(Debug, Clone, PartialEq, Eq, Arbitrary)]
pub enum Operation {
    /// Append to master.
    PushMaster {
        /// Appended value.
        value: ModelValue,
    },

    /// Append to target.
    PushTarget {
        /// Appended value.
        value: ModelValue,
    },

    /// Insert into master.
    InsertMaster {
        /// Insertion index, at most the length.
        index: ModelIndex,
        /// Inserted value.
        value: ModelValue,
    },

    /// Insert into target.
    InsertTarget {
        /// Insertion index, at most the length.
        index: ModelIndex,
        /// Inserted value.
        value: ModelValue,
    },

    /// Remove from master.
    RemoveMaster {
        /// Index of the removed item.
        index: ModelIndex,
    },

    /// Remove from target.
    RemoveTarget {
        /// Index of the removed item.
        index: ModelIndex,
    },

    /// Move an item within master.
    MoveMaster {
        /// Current index.
        from: ModelIndex,
        /// Final index.
        to: ModelIndex,
    },

    /// Move an item within target.
    MoveTarget {
        /// Current index.
        from: ModelIndex,
        /// Final index.
        to: ModelIndex,
    },

    /// Overwrite one master item.
    ReplaceMaster {
        /// Index of the overwritten item.
        index: ModelIndex,
        /// New value.
        value: ModelValue,
    },

    /// Overwrite one target item.
    ReplaceTarget {
        /// Index of the overwritten item.
        index: ModelIndex,
        /// New value.
        value: ModelValue,
    },

    /// Empty master.
    ClearMaster,

    /// Empty target.
    ClearTarget,

    /// Replace master's contents wholesale.
    ResetMaster {
        /// New contents.
        values: Vec<ModelValue>,
    },

    /// Replace target's contents wholesale.
    ResetTarget {
        /// New contents.
        values: Vec<ModelValue>,
    },

    /// Stop the synchronizer.
    Stop,

    /// Start (or re-reconcile) the synchronizer.
    Start,
}

/// Result of applying an operation.
///
/// Used to compare model and real system behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationResult {
    /// Operation succeeded (a vetoed insert also succeeds).
    Ok,

    /// Operation failed with expected error.
    Error(OperationError),
}

/// Expected errors that can occur during operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// Index outside the mutated collection.
    IndexOutOfRange,

    /// Propagation failed. Never produced by the model.
    Propagation,
}

impl OperationResult {
    /// Check if operation succeeded.
    pub fn is_ok(&self) -> bool {
        matches!(self, OperationResult::Ok)
    }

    /// Check if operation failed.
    pub fn is_err(&self) -> bool {
        !self.is_ok()
    }
}

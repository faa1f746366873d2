//! Binding error types.

use tandem_core::SyncError;
use thiserror::Error;

/// Errors from binding and selection operations.
#[derive(Debug, Error)]
pub enum BindError {
    /// The host has no selection collection to synchronize against.
    #[error("host has no selection to synchronize")]
    NoSelection,

    /// The host does not support the requested selection operation.
    #[error("not supported: {reason}")]
    NotSupported {
        /// Why the operation is unsupported.
        reason: String,
    },

    /// Synchronization failed.
    #[error("synchronization error: {0}")]
    Sync(#[from] SyncError),
}

impl BindError {
    /// Returns true if this error is fatal (unrecoverable).
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Sync(e) => e.is_fatal(),
            Self::NoSelection | Self::NotSupported { .. } => false,
        }
    }
}

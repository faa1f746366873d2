//! Synchronization error types.

use thiserror::Error;

use crate::{change::ChangeKind, convert::ConversionError};

/// Errors from collection mutations and change propagation.
///
/// Errors raised while propagating a change are returned from the mutating
/// call that triggered the notification. Nothing is logged and swallowed.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Index outside the bounds of a collection.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Collection length at the time of the call.
        len: usize,
    },

    /// The conversion contract rejected an element.
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// A raw notification carried a mutation kind code outside the known set.
    #[error("unknown change kind code: {0}")]
    UnknownChangeKind(u8),

    /// A notification's indices or item lists do not match its kind.
    #[error("malformed {kind:?} notification: {reason}")]
    MalformedChange {
        /// Kind the notification claimed to be.
        kind: ChangeKind,
        /// Description of the inconsistency.
        reason: String,
    },
}

impl SyncError {
    /// Returns true if this error signals a broken invariant rather than a
    /// caller mistake.
    ///
    /// Fatal errors abort a synchronization cycle and may leave the two
    /// collections diverged until the next reset.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Conversion(_) | Self::UnknownChangeKind(_) | Self::MalformedChange { .. } => true,
            Self::IndexOutOfRange { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_is_not_fatal() {
        let err = SyncError::IndexOutOfRange { index: 4, len: 2 };
        assert!(!err.is_fatal());
    }

    #[test]
    fn conversion_is_fatal() {
        let err = SyncError::from(ConversionError::new("not a number"));
        assert!(err.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = SyncError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 out of range for length 2");

        let err = SyncError::UnknownChangeKind(9);
        assert_eq!(err.to_string(), "unknown change kind code: 9");
    }
}

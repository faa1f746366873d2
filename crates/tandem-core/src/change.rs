//! Structural change notifications.
//!
//! A [`CollectionChange`] describes one mutation of an ordered collection:
//! what kind it was, which items went in or out, and where.

use crate::error::SyncError;

/// Kind of structural mutation.
///
/// The numeric codes are the ones hosts put on the wire; see
/// [`ChangeKind::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Items were inserted.
    Add,
    /// Items were removed.
    Remove,
    /// Items were overwritten in place.
    Replace,
    /// An item changed position.
    Move,
    /// The contents changed wholesale with no itemized delta.
    Reset,
}

impl ChangeKind {
    /// Numeric code of this kind.
    pub fn code(self) -> u8 {
        match self {
            Self::Add => 0,
            Self::Remove => 1,
            Self::Replace => 2,
            Self::Move => 3,
            Self::Reset => 4,
        }
    }
}

/// Decodes a host's numeric kind code; used by [`CollectionChange::from_raw`].
impl TryFrom<u8> for ChangeKind {
    type Error = SyncError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Add),
            1 => Ok(Self::Remove),
            2 => Ok(Self::Replace),
            3 => Ok(Self::Move),
            4 => Ok(Self::Reset),
            other => Err(SyncError::UnknownChangeKind(other)),
        }
    }
}

/// A structural change raised by an observable collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionChange<T> {
    /// Mutation kind.
    pub kind: ChangeKind,
    /// Items that entered the collection (Add, Replace, Move).
    pub new_items: Vec<T>,
    /// Items that left the collection (Remove, Replace, Move).
    pub old_items: Vec<T>,
    /// Index of the first new item.
    pub new_starting_index: Option<usize>,
    /// Index the first old item occupied.
    pub old_starting_index: Option<usize>,
}

impl<T> CollectionChange<T> {
    /// Items inserted starting at `index`.
    pub fn added(index: usize, items: Vec<T>) -> Self {
        Self {
            kind: ChangeKind::Add,
            new_items: items,
            old_items: Vec::new(),
            new_starting_index: Some(index),
            old_starting_index: None,
        }
    }

    /// Items removed starting at `index`.
    pub fn removed(index: usize, items: Vec<T>) -> Self {
        Self {
            kind: ChangeKind::Remove,
            new_items: Vec::new(),
            old_items: items,
            new_starting_index: None,
            old_starting_index: Some(index),
        }
    }

    /// `old` at `index` overwritten by `new`.
    pub fn replaced(index: usize, old: T, new: T) -> Self {
        Self {
            kind: ChangeKind::Replace,
            new_items: vec![new],
            old_items: vec![old],
            new_starting_index: Some(index),
            old_starting_index: Some(index),
        }
    }

    /// Wholesale change.
    pub fn reset() -> Self {
        Self {
            kind: ChangeKind::Reset,
            new_items: Vec::new(),
            old_items: Vec::new(),
            new_starting_index: None,
            old_starting_index: None,
        }
    }

    /// Build a change from a foreign host's raw notification fields.
    ///
    /// # Errors
    ///
    /// - `SyncError::UnknownChangeKind` if `code` is not a kind code
    /// - `SyncError::MalformedChange` if the fields do not fit the kind
    pub fn from_raw(
        code: u8,
        new_items: Vec<T>,
        old_items: Vec<T>,
        new_starting_index: Option<usize>,
        old_starting_index: Option<usize>,
    ) -> Result<Self, SyncError> {
        let change = Self {
            kind: ChangeKind::try_from(code)?,
            new_items,
            old_items,
            new_starting_index,
            old_starting_index,
        };
        change.validate()?;
        Ok(change)
    }

    /// Checks that indices and item lists are consistent with the kind.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::MalformedChange` naming the missing piece.
    pub fn validate(&self) -> Result<(), SyncError> {
        let malformed = |reason: &str| SyncError::MalformedChange {
            kind: self.kind,
            reason: reason.to_string(),
        };

        match self.kind {
            ChangeKind::Add => {
                if self.new_starting_index.is_none() {
                    return Err(malformed("missing new starting index"));
                }
            },
            ChangeKind::Remove => {
                if self.old_starting_index.is_none() {
                    return Err(malformed("missing old starting index"));
                }
            },
            ChangeKind::Replace | ChangeKind::Move => {
                if self.old_starting_index.is_none() || self.new_starting_index.is_none() {
                    return Err(malformed("missing starting index"));
                }
                if self.kind == ChangeKind::Move && self.old_items.len() != self.new_items.len() {
                    return Err(malformed("moved item counts differ"));
                }
            },
            ChangeKind::Reset => {},
        }

        Ok(())
    }
}

impl<T: Clone> CollectionChange<T> {
    /// `item` moved from `from` to `to`.
    pub fn moved(from: usize, to: usize, item: T) -> Self {
        Self {
            kind: ChangeKind::Move,
            new_items: vec![item.clone()],
            old_items: vec![item],
            new_starting_index: Some(to),
            old_starting_index: Some(from),
        }
    }
}

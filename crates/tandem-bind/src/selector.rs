//! List-selecting host.
//!
//! An `ItemSelector` shows a fixed set of items and keeps a selection that
//! may only contain those items. Anything else pushed into the selection,
//! directly or through a synchronizer, is declined. In single mode a second
//! item is declined too.

use std::sync::Arc;

use tandem_core::{ObservableCollection, ObservableList, SyncError};

use crate::{binding::SelectionHost, error::BindError};

/// How many items may be selected at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// At most one item.
    Single,
    /// Any number of items.
    #[default]
    Multiple,
}

/// A list control with a selection restricted to its items.
#[derive(Debug)]
pub struct ItemSelector<T> {
    items: Arc<[T]>,
    selected: Arc<ObservableList<T>>,
    mode: SelectionMode,
}

impl<T> ItemSelector<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a selector over `items` with an empty selection.
    pub fn new(items: Vec<T>, mode: SelectionMode) -> Self {
        let items: Arc<[T]> = items.into();
        let selectable = Arc::clone(&items);
        let selected = ObservableList::with_admission(move |item: &T| selectable.contains(item));
        let selected = Arc::new(match mode {
            SelectionMode::Single => selected.with_max_len(1),
            SelectionMode::Multiple => selected,
        });

        Self { items, selected, mode }
    }

    /// The selectable items.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Selection mode.
    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// The live selection.
    pub fn selected(&self) -> &Arc<ObservableList<T>> {
        &self.selected
    }

    /// Index into [`items`](Self::items) of the first selected item.
    pub fn selected_index(&self) -> Option<usize> {
        let first = self.selected.get(0)?;
        self.items.iter().position(|item| *item == first)
    }

    /// Select exactly the item at `index`.
    pub fn select_index(&self, index: usize) -> Result<(), BindError> {
        let item = self
            .items
            .get(index)
            .cloned()
            .ok_or(SyncError::IndexOutOfRange { index, len: self.items.len() })?;

        self.selected.replace_all(vec![item])?;
        Ok(())
    }

    /// Select exactly `item`. Returns `false` if it is not selectable.
    pub fn set_selected_item(&self, item: T) -> Result<bool, BindError> {
        if !self.selected.admits(&item) {
            return Ok(false);
        }

        self.selected.replace_all(vec![item])?;
        Ok(true)
    }

    /// Add `item` to the selection.
    ///
    /// In single mode this replaces the selection. Returns `false` if the
    /// item is not selectable or already selected.
    pub fn add_to_selection(&self, item: T) -> Result<bool, BindError> {
        if self.mode == SelectionMode::Single {
            return self.set_selected_item(item);
        }
        if self.selected.contains(&item) {
            return Ok(false);
        }

        Ok(self.selected.push(item)?)
    }

    /// Select every item.
    ///
    /// # Errors
    ///
    /// `BindError::NotSupported` in single mode.
    pub fn select_all(&self) -> Result<(), BindError> {
        if self.mode == SelectionMode::Single {
            return Err(BindError::NotSupported {
                reason: "select all requires multiple selection mode".to_string(),
            });
        }

        self.selected.replace_all(self.items.to_vec())?;
        Ok(())
    }

    /// Clear the selection.
    pub fn unselect_all(&self) -> Result<(), BindError> {
        self.selected.clear()?;
        Ok(())
    }
}

impl<T> SelectionHost<T> for ItemSelector<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    fn selected_items(&self) -> Option<Arc<dyn ObservableCollection<T>>> {
        Some(Arc::clone(&self.selected) as Arc<dyn ObservableCollection<T>>)
    }
}

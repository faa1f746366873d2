//! Range-picking host.
//!
//! Models a date-picking control: any value inside an inclusive range can be
//! selected, values outside it are declined.

use std::sync::Arc;

use tandem_core::{ObservableCollection, ObservableList};

use crate::{binding::SelectionHost, error::BindError};

/// A picker whose selection is bounded by `[first, last]`.
#[derive(Debug)]
pub struct RangeSelector<T> {
    first: T,
    last: T,
    selected: Arc<ObservableList<T>>,
}

impl<T> RangeSelector<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    /// Create a picker over the inclusive range `first..=last`.
    ///
    /// The bounds are swapped if given in reverse.
    pub fn new(first: T, last: T) -> Self {
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        let (low, high) = (first.clone(), last.clone());
        let selected = Arc::new(ObservableList::with_admission(move |value: &T| {
            low <= *value && *value <= high
        }));

        Self { first, last, selected }
    }

    /// Inclusive bounds.
    pub fn bounds(&self) -> (&T, &T) {
        (&self.first, &self.last)
    }

    /// The live selection.
    pub fn selected(&self) -> &Arc<ObservableList<T>> {
        &self.selected
    }

    /// Add `value` to the selection.
    ///
    /// Returns `false` if it is out of range or already selected.
    pub fn select(&self, value: T) -> Result<bool, BindError> {
        if self.selected.contains(&value) {
            return Ok(false);
        }

        Ok(self.selected.push(value)?)
    }

    /// Add several values as one change. Returns how many were selected.
    pub fn select_many(&self, values: impl IntoIterator<Item = T>) -> Result<usize, BindError> {
        let mut fresh: Vec<T> = Vec::new();
        for value in values {
            if !self.selected.contains(&value) && !fresh.contains(&value) {
                fresh.push(value);
            }
        }

        Ok(self.selected.insert_many(self.selected.len(), fresh)?)
    }

    /// Clear the selection.
    pub fn clear(&self) -> Result<(), BindError> {
        self.selected.clear()?;
        Ok(())
    }
}

impl<T> SelectionHost<T> for RangeSelector<T>
where
    T: Ord + Clone + Send + Sync + 'static,
{
    fn selected_items(&self) -> Option<Arc<dyn ObservableCollection<T>>> {
        Some(Arc::clone(&self.selected) as Arc<dyn ObservableCollection<T>>)
    }
}

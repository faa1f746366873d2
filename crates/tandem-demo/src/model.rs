//! View model of the demo.

use std::sync::{Arc, Weak};

use tandem_core::{
    ChangeListener, CollectionChange, CollectionId, ObservableList, SubscriptionId, SyncError,
};

/// Day preselected before any picker is bound.
const INITIAL_DAY: u32 = 1;

/// Every name appears in two secondaries: `{name}1`, then `{name}2` after all
/// the first ones.
pub fn secondaries_for(names: &[String]) -> Vec<String> {
    (1..=2).flat_map(|n| names.iter().map(move |name| format!("{name}{n}"))).collect()
}

/// Owns the lists that selectors are bound to.
///
/// A listener on `selected_names` keeps `selected_secondaries` in step:
/// one selected name selects its secondaries, anything else clears them.
#[derive(Debug)]
pub struct DemoModel {
    names: Vec<String>,
    secondaries: Vec<String>,
    selected_names: Arc<ObservableList<String>>,
    selected_secondaries: Arc<ObservableList<String>>,
    selected_days: Arc<ObservableList<u32>>,
    mapper: SubscriptionId,
}

impl DemoModel {
    /// Create a view model over `names`.
    pub fn new(names: Vec<String>) -> Self {
        let secondaries = secondaries_for(&names);
        let selected_names = Arc::new(ObservableList::new());
        let selected_secondaries = Arc::new(ObservableList::new());
        let selected_days = Arc::new(ObservableList::from_vec(vec![INITIAL_DAY]));

        let mapper = selected_names.subscribe(Arc::new(SecondaryMapper {
            secondaries: secondaries.clone(),
            selected_names: Arc::downgrade(&selected_names),
            selected_secondaries: Arc::clone(&selected_secondaries),
        }));

        Self { names, secondaries, selected_names, selected_secondaries, selected_days, mapper }
    }

    /// Selectable names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Selectable secondaries.
    pub fn secondaries(&self) -> &[String] {
        &self.secondaries
    }

    /// List a names selector is bound to.
    pub fn selected_names(&self) -> &Arc<ObservableList<String>> {
        &self.selected_names
    }

    /// List a secondaries selector is bound to.
    pub fn selected_secondaries(&self) -> &Arc<ObservableList<String>> {
        &self.selected_secondaries
    }

    /// List a day picker is bound to.
    pub fn selected_days(&self) -> &Arc<ObservableList<u32>> {
        &self.selected_days
    }

    /// Select every name by rewriting the bound list item by item.
    pub fn select_all_names(&self) -> Result<(), SyncError> {
        self.selected_names.clear()?;
        for name in &self.names {
            self.selected_names.push(name.clone())?;
        }
        Ok(())
    }

    /// One-line description of the names selection.
    pub fn summary(&self) -> String {
        format!("{} names are selected.", self.selected_names.len())
    }

    /// Earliest selected day.
    pub fn start_day(&self) -> Option<u32> {
        self.selected_days.snapshot().into_iter().min()
    }

    /// Latest selected day.
    pub fn end_day(&self) -> Option<u32> {
        self.selected_days.snapshot().into_iter().max()
    }
}

impl Drop for DemoModel {
    fn drop(&mut self) {
        self.selected_names.unsubscribe(self.mapper);
    }
}

struct SecondaryMapper {
    secondaries: Vec<String>,
    selected_names: Weak<ObservableList<String>>,
    selected_secondaries: Arc<ObservableList<String>>,
}

impl ChangeListener<String> for SecondaryMapper {
    fn collection_changed(
        &self,
        _sender: CollectionId,
        _change: &CollectionChange<String>,
    ) -> Result<(), SyncError> {
        let Some(selected_names) = self.selected_names.upgrade() else {
            return Ok(());
        };

        let selected = selected_names.snapshot();
        tracing::debug!(?selected, "selected names changed");

        let wanted: Vec<String> = match selected.as_slice() {
            [name] => self
                .secondaries
                .iter()
                .filter(|secondary| secondary.contains(name.as_str()))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };

        if self.selected_secondaries.snapshot() != wanted {
            self.selected_secondaries.replace_all(wanted)?;
        }
        Ok(())
    }
}

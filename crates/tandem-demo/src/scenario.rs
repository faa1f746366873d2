//! Scripted run of the demo.

use std::sync::Arc;

use tandem_bind::{BindError, ItemSelector, RangeSelector, SelectionBinding, SelectionMode};
use tandem_core::{ObservableCollection, ObservableList};

use crate::model::DemoModel;

/// Days a day picker offers.
const FIRST_DAY: u32 = 1;
const LAST_DAY: u32 = 31;

/// What to replay.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Selectable names.
    pub names: Vec<String>,
    /// Names picked one after another in the names selector.
    pub picks: Vec<String>,
    /// Days picked at once in the day picker.
    pub days: Vec<u32>,
}

/// Observations made while replaying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Secondaries selected after each accepted pick.
    pub picked: Vec<(String, Vec<String>)>,
    /// Picks the names selector declined.
    pub declined: Vec<String>,
    /// Names selector's selection size after the view model selected all.
    pub selected_after_select_all: usize,
    /// Secondaries left selected after the view model selected all.
    pub secondaries_after_select_all: usize,
    /// Earliest and latest picked day.
    pub day_range: Option<(u32, u32)>,
    /// Names selector's selection size after its old list changed post-rebind.
    pub selected_after_rebind: usize,
}

impl Scenario {
    /// Bind selectors to a fresh view model and replay every step.
    ///
    /// # Errors
    ///
    /// Any binding or propagation failure.
    pub fn run(&self) -> Result<Report, BindError> {
        let model = DemoModel::new(self.names.clone());
        let mut report = Report::default();

        let mut names = SelectionBinding::new(ItemSelector::new(
            model.names().to_vec(),
            SelectionMode::Multiple,
        ));
        names.set_synchronized(Some(as_collection(model.selected_names())))?;

        let mut secondaries = SelectionBinding::new(ItemSelector::new(
            model.secondaries().to_vec(),
            SelectionMode::Multiple,
        ));
        secondaries.set_synchronized(Some(as_collection(model.selected_secondaries())))?;

        let mut days = SelectionBinding::new(RangeSelector::new(FIRST_DAY, LAST_DAY));
        days.set_synchronized(Some(as_collection(model.selected_days())))?;

        tracing::info!(summary = %model.summary(), "selectors bound");

        for pick in &self.picks {
            if !names.host().set_selected_item(pick.clone())? {
                tracing::warn!(%pick, "not a selectable name");
                report.declined.push(pick.clone());
                continue;
            }

            let selected = secondaries.host().selected().snapshot();
            tracing::info!(%pick, secondaries = ?selected, summary = %model.summary(), "picked");
            report.picked.push((pick.clone(), selected));
        }

        model.select_all_names()?;
        report.selected_after_select_all = names.host().selected().len();
        report.secondaries_after_select_all = secondaries.host().selected().len();
        tracing::info!(
            summary = %model.summary(),
            secondaries = report.secondaries_after_select_all,
            "view model selected all names"
        );

        days.host().select_many(self.days.iter().copied())?;
        report.day_range = model.start_day().zip(model.end_day());
        tracing::info!(range = ?report.day_range, "days picked");

        let fresh = Arc::new(ObservableList::<String>::new());
        names.set_synchronized(Some(as_collection(&fresh)))?;
        model.selected_names().clear()?;
        report.selected_after_rebind = names.host().selected().len();
        tracing::info!(
            selected = report.selected_after_rebind,
            "names selector rebound, old list no longer drives it"
        );

        names.detach();
        secondaries.detach();
        days.detach();

        Ok(report)
    }
}

fn as_collection<T>(list: &Arc<ObservableList<T>>) -> Arc<dyn ObservableCollection<T>>
where
    T: Clone + Send + Sync + 'static,
{
    Arc::clone(list) as Arc<dyn ObservableCollection<T>>
}

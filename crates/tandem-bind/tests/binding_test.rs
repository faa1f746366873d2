//! Selection binding tests

use std::sync::Arc;

use proptest::prelude::*;
use tandem_bind::{
    BindError, ItemSelector, RangeSelector, SelectionBinding, SelectionHost, SelectionMode,
};
use tandem_core::{ObservableCollection, ObservableList};

const NAMES: [&str; 4] = ["Abraham", "Lincoln", "James", "Buchanan"];

type Names = Arc<ObservableList<&'static str>>;

fn bound() -> (SelectionBinding<&'static str, ItemSelector<&'static str>>, Names) {
    let selector = ItemSelector::new(NAMES.to_vec(), SelectionMode::Multiple);
    let selected_names: Names = Arc::new(ObservableList::new());
    let mut binding = SelectionBinding::new(selector);
    binding.set_synchronized(Some(selected_names.clone())).unwrap();
    (binding, selected_names)
}

#[test]
fn initialises_to_no_selection() {
    let (binding, selected_names) = bound();

    assert!(binding.is_attached());
    assert!(selected_names.is_empty());
}

#[test]
fn select_all_reaches_bound_list() {
    let (binding, selected_names) = bound();

    binding.host().select_all().unwrap();

    assert_eq!(selected_names.len(), NAMES.len());
}

#[test]
fn selected_index_reaches_bound_list() {
    let (binding, selected_names) = bound();

    binding.host().select_index(0).unwrap();

    assert_eq!(selected_names.snapshot(), vec!["Abraham"]);
}

#[test]
fn selected_item_reaches_bound_list() {
    let (binding, selected_names) = bound();

    assert!(binding.host().set_selected_item("James").unwrap());

    assert_eq!(selected_names.snapshot(), vec!["James"]);
}

#[test]
fn selecting_several_items_keeps_order() {
    let (binding, selected_names) = bound();

    binding.host().add_to_selection(NAMES[0]).unwrap();
    binding.host().add_to_selection(NAMES[1]).unwrap();

    assert_eq!(selected_names.snapshot(), binding.host().selected().snapshot());
    assert_eq!(selected_names.snapshot(), vec!["Abraham", "Lincoln"]);
}

#[test]
fn adding_to_bound_list_selects_in_host() {
    let (binding, selected_names) = bound();

    selected_names.push(NAMES[0]).unwrap();
    selected_names.push(NAMES[3]).unwrap();

    assert_eq!(binding.host().selected().snapshot(), selected_names.snapshot());
}

#[test]
fn unselectable_item_in_bound_list_is_not_selected() {
    let (binding, selected_names) = bound();

    selected_names.push("Nobody").unwrap();

    assert!(binding.host().selected().is_empty());
}

#[test]
fn bound_list_reset_is_corrected_to_selectable_items() {
    let (binding, selected_names) = bound();

    selected_names.replace_all(vec!["Nobody", "James", "Lincoln"]).unwrap();

    assert_eq!(binding.host().selected().snapshot(), vec!["James", "Lincoln"]);
    assert_eq!(selected_names.snapshot(), vec!["James", "Lincoln"]);
}

#[test]
fn binding_overwrites_prepopulated_list() {
    let selector = ItemSelector::new(NAMES.to_vec(), SelectionMode::Multiple);
    selector.select_index(1).unwrap();
    let selected_names = Arc::new(ObservableList::from_vec(vec!["James", "Nobody"]));

    let mut binding = SelectionBinding::new(selector);
    binding.set_synchronized(Some(selected_names.clone())).unwrap();

    assert_eq!(selected_names.snapshot(), vec!["Lincoln"]);
}

#[test]
fn rebinding_detaches_previous_list() {
    let (mut binding, selected_names) = bound();
    let second_names: Names = Arc::new(ObservableList::new());

    binding.set_synchronized(Some(second_names.clone())).unwrap();
    selected_names.push(NAMES[0]).unwrap();
    selected_names.push(NAMES[3]).unwrap();

    assert!(binding.host().selected().is_empty());
    assert_eq!(selected_names.listener_count(), 0);
}

#[test]
fn rebinding_synchronizes_new_list() {
    let (mut binding, _selected_names) = bound();
    let second_names: Names = Arc::new(ObservableList::new());

    binding.set_synchronized(Some(second_names.clone())).unwrap();
    second_names.push(NAMES[0]).unwrap();
    second_names.push(NAMES[3]).unwrap();

    assert_eq!(binding.host().selected().snapshot(), vec!["Abraham", "Buchanan"]);
}

#[test]
fn clearing_binding_stops_propagation() {
    let (mut binding, selected_names) = bound();

    binding.set_synchronized(None).unwrap();
    binding.host().select_all().unwrap();

    assert!(!binding.is_attached());
    assert!(binding.synchronized().is_none());
    assert!(selected_names.is_empty());
}

#[test]
fn detach_is_repeatable() {
    let (mut binding, selected_names) = bound();

    binding.detach();
    binding.detach();
    selected_names.push(NAMES[2]).unwrap();

    assert!(binding.host().selected().is_empty());
}

#[test]
fn single_mode_host_holds_at_most_one_item() {
    let selector = ItemSelector::new(NAMES.to_vec(), SelectionMode::Single);
    let selected_names: Names = Arc::new(ObservableList::new());
    let mut binding = SelectionBinding::new(selector);
    binding.set_synchronized(Some(selected_names.clone())).unwrap();

    selected_names.push(NAMES[0]).unwrap();
    selected_names.push(NAMES[1]).unwrap();
    assert_eq!(binding.host().selected().snapshot(), vec!["Abraham"]);

    // A reset realigns the bound list with what the host accepted.
    selected_names.replace_all(vec![NAMES[2], NAMES[3]]).unwrap();
    assert_eq!(binding.host().selected().snapshot(), vec!["James"]);
    assert_eq!(selected_names.snapshot(), vec!["James"]);
}

#[test]
fn range_selector_binds_like_a_calendar() {
    let picker = RangeSelector::new(1u32, 31);
    let days = Arc::new(ObservableList::from_vec(vec![12u32]));
    let mut binding = SelectionBinding::new(picker);
    binding.set_synchronized(Some(days.clone())).unwrap();

    // The picker's empty selection wins on attach.
    assert!(days.is_empty());

    binding.host().select_many([3, 4, 5]).unwrap();
    assert_eq!(days.snapshot(), vec![3, 4, 5]);

    days.push(40).unwrap();
    assert_eq!(binding.host().selected().snapshot(), vec![3, 4, 5]);

    days.remove(0).unwrap();
    assert_eq!(binding.host().selected().snapshot(), vec![4, 5]);
}

/// A host that has nothing to offer.
struct Blank;

impl SelectionHost<u8> for Blank {
    fn selected_items(&self) -> Option<Arc<dyn ObservableCollection<u8>>> {
        None
    }
}

#[test]
fn host_without_selection_cannot_bind() {
    let mut binding = SelectionBinding::new(Blank);

    let result = binding.set_synchronized(Some(Arc::new(ObservableList::<u8>::new())));

    assert!(matches!(result, Err(BindError::NoSelection)));
    assert!(!binding.is_attached());
}

proptest! {
    /// Whatever is pushed into the bound list, the host only ever holds
    /// selectable names, and both sides agree once a reset settles.
    #[test]
    fn host_selection_stays_selectable(picks in prop::collection::vec(0usize..6, 0..20)) {
        let (binding, selected_names) = bound();
        let pool = ["Abraham", "Lincoln", "James", "Buchanan", "Nobody", "Someone"];

        for pick in picks {
            selected_names.push(pool[pick]).unwrap();
        }
        selected_names.replace_all(selected_names.snapshot()).unwrap();

        let selection = binding.host().selected().snapshot();
        prop_assert!(selection.iter().all(|name| NAMES.contains(name)));
        prop_assert_eq!(selection, selected_names.snapshot());
    }
}

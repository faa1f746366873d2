//! Synchronizer tests

use std::{sync::Arc, thread};

use parking_lot::Mutex;
use proptest::prelude::*;
use tandem_core::{
    ChangeKind, ChangeListener, CollectionChange, CollectionId, ConversionError, FnConverter,
    ObservableList, SyncError, SyncPhase, Synchronizer,
};

/// Counts notifications per kind.
#[derive(Default)]
struct Counter {
    kinds: Mutex<Vec<ChangeKind>>,
}

impl<T> ChangeListener<T> for Counter {
    fn collection_changed(
        &self,
        _sender: CollectionId,
        change: &CollectionChange<T>,
    ) -> Result<(), SyncError> {
        self.kinds.lock().push(change.kind);
        Ok(())
    }
}

fn list<T: Clone + Send + Sync + 'static>(items: Vec<T>) -> Arc<ObservableList<T>> {
    Arc::new(ObservableList::from_vec(items))
}

fn upper() -> impl tandem_core::ItemConverter<char, String> {
    FnConverter::new(
        |c: &char| Ok(c.to_ascii_uppercase().to_string()),
        |s: &String| {
            s.chars()
                .next()
                .map(|c| c.to_ascii_lowercase())
                .ok_or_else(|| ConversionError::new("empty string"))
        },
    )
}

#[test]
fn start_copies_master_into_empty_target() {
    let master = list(vec!['a', 'b', 'c']);
    let target = list(Vec::new());
    let sync = Synchronizer::with_converter(master.clone(), target.clone(), upper());

    sync.start().unwrap();

    assert_eq!(target.snapshot(), vec!["A", "B", "C"]);
    assert!(sync.is_converged().unwrap());
}

#[test]
fn start_corrects_master_when_target_vetoes() {
    let master = list(vec!["Abraham", "Nobody", "James"]);
    let known = ["Abraham", "Lincoln", "James", "Buchanan"];
    let target = Arc::new(ObservableList::with_admission(move |name: &&str| known.contains(name)));
    let sync = Synchronizer::new(master.clone(), target.clone());

    sync.start().unwrap();

    assert_eq!(target.snapshot(), vec!["Abraham", "James"]);
    assert_eq!(master.snapshot(), vec!["Abraham", "James"]);
}

#[test]
fn start_does_not_touch_master_without_veto() {
    let master = list(vec![1, 2, 3]);
    let target = list(vec![9]);
    let master_events = Arc::new(Counter::default());
    master.subscribe(master_events.clone());

    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    assert!(master_events.kinds.lock().is_empty());
    assert_eq!(target.snapshot(), vec![1, 2, 3]);
}

#[test]
fn insert_into_master_raises_exactly_one_target_insert() {
    let master = list(vec![1]);
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    let master_events = Arc::new(Counter::default());
    let target_events = Arc::new(Counter::default());
    master.subscribe(master_events.clone());
    target.subscribe(target_events.clone());

    master.push(2).unwrap();

    assert_eq!(*master_events.kinds.lock(), vec![ChangeKind::Add]);
    assert_eq!(*target_events.kinds.lock(), vec![ChangeKind::Add]);
    assert_eq!(target.snapshot(), vec![1, 2]);
}

#[test]
fn insert_into_target_raises_exactly_one_master_insert() {
    let master = list(vec![1]);
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    let master_events = Arc::new(Counter::default());
    master.subscribe(master_events.clone());

    target.insert(0, 0).unwrap();

    assert_eq!(*master_events.kinds.lock(), vec![ChangeKind::Add]);
    assert_eq!(master.snapshot(), vec![0, 1]);
}

#[test]
fn insert_preserves_order() {
    let master = list(vec!['a', 'b', 'c', 'd']);
    let target = list(Vec::new());
    let sync = Synchronizer::with_converter(master.clone(), target.clone(), upper());
    sync.start().unwrap();

    master.insert(2, 'x').unwrap();

    assert_eq!(target.snapshot(), vec!["A", "B", "X", "C", "D"]);
}

#[test]
fn remove_is_positional() {
    let master = list(vec!['a', 'b', 'c']);
    let target = list(Vec::new());
    let sync = Synchronizer::with_converter(master.clone(), target.clone(), upper());
    sync.start().unwrap();

    master.remove(1).unwrap();

    assert_eq!(target.snapshot(), vec!["A", "C"]);
}

#[test]
fn ranges_propagate_item_by_item() {
    let master = list(vec![1, 5]);
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    master.insert_many(1, vec![2, 3, 4]).unwrap();
    assert_eq!(target.snapshot(), vec![1, 2, 3, 4, 5]);

    target.remove_range(0, 3).unwrap();
    assert_eq!(master.snapshot(), vec![4, 5]);
}

#[test]
fn move_and_replace_propagate() {
    let master = list(vec!['a', 'b', 'c']);
    let target = list(Vec::new());
    let sync = Synchronizer::with_converter(master.clone(), target.clone(), upper());
    sync.start().unwrap();

    master.move_item(0, 2).unwrap();
    assert_eq!(target.snapshot(), vec!["B", "C", "A"]);

    target.replace(1, "Z".to_string()).unwrap();
    assert_eq!(master.snapshot(), vec!['b', 'z', 'a']);
}

#[test]
fn reset_overwrites_the_other_side() {
    let master = list(vec![1, 2]);
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    master.replace_all(vec![7, 8, 9]).unwrap();
    assert_eq!(target.snapshot(), vec![7, 8, 9]);

    target.clear().unwrap();
    assert!(master.is_empty());
}

#[test]
fn target_reset_with_veto_keeps_master_authoritative_for_rejects() {
    let master = Arc::new(ObservableList::with_admission(|n: &i32| *n >= 0));
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    target.replace_all(vec![1, -2, 3]).unwrap();

    // Master declined -2, so target is corrected from master.
    assert_eq!(master.snapshot(), vec![1, 3]);
    assert_eq!(target.snapshot(), vec![1, 3]);
}

#[test]
fn index_skew_is_clamped_and_healed_by_reset() {
    let master = list(vec!['a', 'b']);
    let target = Arc::new(ObservableList::with_admission(|c: &char| *c != 'x'));
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    // Declined by the target: the lists diverge in length.
    master.push('x').unwrap();
    assert_eq!(target.snapshot(), vec!['a', 'b']);

    // Index 3 is past the target's end, so it is appended.
    master.push('y').unwrap();
    assert_eq!(target.snapshot(), vec!['a', 'b', 'y']);

    // Index 3 is out of the target's bounds, so nothing is removed.
    master.remove(3).unwrap();
    assert_eq!(target.snapshot(), vec!['a', 'b', 'y']);

    master.replace_all(vec!['c', 'x']).unwrap();
    assert_eq!(master.snapshot(), vec!['c']);
    assert_eq!(target.snapshot(), vec!['c']);
    assert!(sync.is_converged().unwrap());
}

#[test]
fn stop_ends_propagation_both_ways() {
    let master = list(vec![1]);
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    sync.stop();
    master.push(2).unwrap();
    target.push(3).unwrap();

    assert_eq!(master.snapshot(), vec![1, 2]);
    assert_eq!(target.snapshot(), vec![1, 3]);
}

#[test]
fn stop_before_start_and_twice_is_harmless() {
    let sync = Synchronizer::new(list(vec![1]), list(Vec::<i32>::new()));

    sync.stop();
    sync.stop();

    assert!(!sync.is_running());
}

#[test]
fn swapped_roles_behave_the_same() {
    let left = list(vec![1, 2, 3]);
    let right = list(Vec::new());

    let forward = Synchronizer::new(left.clone(), right.clone());
    forward.start().unwrap();
    right.insert(1, 9).unwrap();
    left.remove(0).unwrap();
    let forward_result = (left.snapshot(), right.snapshot());
    forward.stop();

    let left = list(vec![1, 2, 3]);
    let right = list(Vec::new());
    right.replace_all(left.snapshot()).unwrap();

    let backward = Synchronizer::new(right.clone(), left.clone());
    backward.start().unwrap();
    right.insert(1, 9).unwrap();
    left.remove(0).unwrap();

    assert_eq!((left.snapshot(), right.snapshot()), forward_result);
    assert_eq!(forward_result.0, vec![9, 2, 3]);
}

#[test]
fn failing_conversion_fails_the_triggering_mutation() {
    let converter = FnConverter::new(
        |n: &i32| {
            if *n == 13 {
                Err(ConversionError::new("unlucky"))
            } else {
                Ok(*n)
            }
        },
        |n: &i32| Ok(*n),
    );
    let master = list(vec![1]);
    let target = list(Vec::new());
    let sync = Synchronizer::with_converter(master.clone(), target.clone(), converter);
    sync.start().unwrap();

    let result = master.push(13);

    assert!(matches!(result, Err(SyncError::Conversion(_))));
    assert_eq!(master.snapshot(), vec![1, 13]);
    assert_eq!(target.snapshot(), vec![1]);
    assert_eq!(sync.phase(), SyncPhase::Idle);

    // The target subscription was resumed despite the failure. The lists
    // stay diverged, so the new item lands at the target's index.
    target.push(2).unwrap();
    assert_eq!(master.snapshot(), vec![1, 2, 13]);
}

#[test]
fn failing_bulk_conversion_leaves_target_untouched() {
    let converter = FnConverter::new(
        |n: &i32| if *n < 0 { Err(ConversionError::new("negative")) } else { Ok(*n) },
        |n: &i32| Ok(*n),
    );
    let master = list(vec![1, -1]);
    let target = list(vec![5]);
    let sync = Synchronizer::with_converter(master.clone(), target.clone(), converter);

    let result = sync.start();

    assert!(matches!(result, Err(SyncError::Conversion(_))));
    assert_eq!(target.snapshot(), vec![5]);
}

/// Mirrors a host that reacts to selection changes by selecting more.
struct Companion {
    master: Arc<ObservableList<char>>,
}

impl ChangeListener<char> for Companion {
    fn collection_changed(
        &self,
        _sender: CollectionId,
        change: &CollectionChange<char>,
    ) -> Result<(), SyncError> {
        if change.new_items.contains(&'a') {
            self.master.push('b')?;
        }
        Ok(())
    }
}

#[test]
fn nested_change_during_propagation_is_handled() {
    let master = list(Vec::new());
    let target = list(Vec::new());
    target.subscribe(Arc::new(Companion { master: master.clone() }));
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    master.push('a').unwrap();

    assert_eq!(master.snapshot(), vec!['a', 'b']);
    assert_eq!(target.snapshot(), vec!['a', 'b']);
    assert_eq!(sync.phase(), SyncPhase::Idle);
}

#[test]
fn concurrent_pushes_serialize() {
    let master = list(Vec::new());
    let target = list(Vec::new());
    let sync = Synchronizer::new(master.clone(), target.clone());
    sync.start().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let master = master.clone();
            thread::spawn(move || {
                for i in 0..25 {
                    master.push(worker * 100 + i).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let mut master_items = master.snapshot();
    let mut target_items = target.snapshot();
    assert_eq!(master_items.len(), 100);
    assert_eq!(target_items.len(), 100);
    master_items.sort_unstable();
    target_items.sort_unstable();
    assert_eq!(master_items, target_items);

    // A reset realigns positions.
    master.replace_all(master.snapshot()).unwrap();
    assert!(sync.is_converged().unwrap());
}

proptest! {
    #[test]
    fn start_converges_through_converter(items in prop::collection::vec(0u32..1000, 0..40)) {
        let converter = FnConverter::new(
            |n: &u32| Ok(n.to_string()),
            |s: &String| s.parse::<u32>().map_err(|e| ConversionError::new(e.to_string())),
        );
        let master = list(items.clone());
        let target = list(vec!["stale".to_string()]);
        let sync = Synchronizer::with_converter(master.clone(), target.clone(), converter);

        sync.start().unwrap();

        let expected: Vec<String> = items.iter().map(ToString::to_string).collect();
        prop_assert_eq!(target.snapshot(), expected);
        prop_assert_eq!(master.snapshot(), items);
    }
}

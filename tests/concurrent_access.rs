//! Concurrent mutation and notification
//!
//! Several threads select and deselect against one shared store while
//! observers run. Checks that the partition invariants survive and that
//! every committed mutation produced exactly one selection callback and one
//! change callback, delivered in commit order.
//!
//! Run with: `cargo test --test concurrent_access`

mod common;

use chipstore::{Chip, ChipStore, Partition, SelectionObserver};
use common::{assert_partitions_consistent, numbered};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

const WORKERS: usize = 4;
const ROUNDS: usize = 200;

#[derive(Default)]
struct Counter {
    added: AtomicUsize,
    removed: AtomicUsize,
}

impl SelectionObserver for Counter {
    fn on_chip_added(&self, _chip: &Chip) {
        self.added.fetch_add(1, Ordering::SeqCst);
    }

    fn on_chip_removed(&self, _chip: &Chip) {
        self.removed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn concurrent_select_deselect_keeps_partitions_consistent() {
    let store = Arc::new(ChipStore::new());
    store.load(numbered(16)).unwrap();

    let counter = Arc::new(Counter::default());
    store.set_selection_observer(counter.clone());
    let changes = Arc::new(AtomicUsize::new(0));
    let change_count = changes.clone();
    store.add_change_observer(Arc::new(move || {
        change_count.fetch_add(1, Ordering::SeqCst);
    }));

    let committed = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..WORKERS)
        .map(|worker| {
            let store = Arc::clone(&store);
            let committed = Arc::clone(&committed);
            thread::spawn(move || {
                for round in 0..ROUNDS {
                    let result = if (worker + round) % 2 == 0 {
                        store.select_at(0)
                    } else {
                        store.deselect_at(0)
                    };
                    if result.is_ok() {
                        committed.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = assert_partitions_consistent(&store);
    assert_eq!(snapshot.original.len() + snapshot.selected.len(), 16);

    let added = counter.added.load(Ordering::SeqCst);
    let removed = counter.removed.load(Ordering::SeqCst);
    assert_eq!(added + removed, committed.load(Ordering::SeqCst));
    assert_eq!(added - removed, store.len(Partition::Selected));
    assert_eq!(changes.load(Ordering::SeqCst), committed.load(Ordering::SeqCst));
}

#[test]
fn registration_while_mutating_does_not_deadlock() {
    let store = Arc::new(ChipStore::new());
    store.load(numbered(8)).unwrap();

    let mutator = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..ROUNDS {
                let _ = store.select_at(0);
                let _ = store.deselect_at(0);
            }
        })
    };

    for _ in 0..ROUNDS {
        let id = store.add_change_observer(Arc::new(|| {}));
        assert!(store.remove_change_observer(id));
    }
    mutator.join().unwrap();

    assert_eq!(store.change_observer_count(), 0);
    assert_partitions_consistent(&store);
}

/// Records every selection callback as (chip id, added?)
#[derive(Default)]
struct EventLog {
    events: Mutex<Vec<(String, bool)>>,
}

impl SelectionObserver for EventLog {
    fn on_chip_added(&self, chip: &Chip) {
        self.events.lock().unwrap().push((chip.id.to_string(), true));
    }

    fn on_chip_removed(&self, chip: &Chip) {
        self.events.lock().unwrap().push((chip.id.to_string(), false));
    }
}

#[test]
fn concurrent_notifications_follow_commit_order() {
    let store = Arc::new(ChipStore::new());
    store.load(numbered(2)).unwrap();
    let log = Arc::new(EventLog::default());
    store.set_selection_observer(log.clone());

    let handles: Vec<_> = (0..WORKERS)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..ROUNDS {
                    let _ = store.select_at(0);
                    let _ = store.deselect_at(0);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Per chip, callbacks must alternate added/removed starting with added.
    let mut selected: HashMap<String, bool> = HashMap::new();
    for (id, added) in log.events.lock().unwrap().iter() {
        let was_selected = selected.insert(id.clone(), *added).unwrap_or(false);
        assert_ne!(was_selected, *added, "out-of-order callback for {}", id);
    }

    let snapshot = assert_partitions_consistent(&store);
    for chip in &snapshot.selected {
        assert_eq!(selected.get(chip.id.as_str()), Some(&true));
    }
    for chip in &snapshot.filtered {
        assert_ne!(selected.get(chip.id.as_str()), Some(&true));
    }
}

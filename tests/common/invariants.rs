//! Structural checks over a store snapshot

use chipstore::{Chip, ChipStore, PartitionSnapshot};
use std::collections::HashSet;

fn id_set(chips: &[Chip]) -> HashSet<String> {
    chips.iter().map(|c| c.id.to_string()).collect()
}

/// Assert the partition invariants on a single consistent snapshot:
/// original mirrors filtered, no identity is both available and selected,
/// no partition holds duplicates, and every available chip is filterable.
pub fn assert_partitions_consistent(store: &ChipStore) -> PartitionSnapshot {
    let snapshot = store.snapshot();

    let original = id_set(&snapshot.original);
    let filtered = id_set(&snapshot.filtered);
    let selected = id_set(&snapshot.selected);

    assert_eq!(original.len(), snapshot.original.len(), "duplicate in original");
    assert_eq!(filtered.len(), snapshot.filtered.len(), "duplicate in filtered");
    assert_eq!(selected.len(), snapshot.selected.len(), "duplicate in selected");
    assert_eq!(original, filtered, "original and filtered diverged");
    assert!(
        original.is_disjoint(&selected),
        "chip both available and selected: {:?}",
        original.intersection(&selected).collect::<Vec<_>>()
    );
    assert!(
        snapshot.filtered.iter().all(Chip::is_filterable),
        "non-filterable chip in filtered"
    );

    snapshot
}

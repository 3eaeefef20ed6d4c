//! Common test utilities for chipstore integration tests
//!
//! Fixture chips plus an invariant checker shared by the property and
//! concurrency tests.

#![allow(dead_code)]

pub mod invariants;

pub use invariants::assert_partitions_consistent;

use chipstore::Chip;

/// A small contact list, deliberately out of natural order
pub fn contacts() -> Vec<Chip> {
    vec![
        Chip::with_id("contact:grace", "Grace Hopper").with_subtitle("grace@example.com"),
        Chip::with_id("contact:ada", "ada Lovelace").with_subtitle("ada@example.com"),
        Chip::with_id("contact:linus", "Linus Torvalds"),
        Chip::with_id("contact:barbara", "Barbara Liskov").with_avatar("liskov.png"),
        Chip::with_id("contact:ken", "Ken Thompson"),
    ]
}

/// `count` chips titled "chip-000", "chip-001", ...
pub fn numbered(count: usize) -> Vec<Chip> {
    (0..count)
        .map(|i| Chip::with_id(format!("n{}", i), format!("chip-{:03}", i)))
        .collect()
}

pub fn ids(chips: &[Chip]) -> Vec<String> {
    chips.iter().map(|c| c.id.to_string()).collect()
}

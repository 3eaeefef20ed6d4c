//! Chipstore: In-Memory Chip Partitioning
//!
//! Tracks selectable tokens ("chips", e.g. contacts or tags) across three
//! mutually exclusive partitions and tells observers when the selection
//! changes.
//!
//! # Core Concepts
//!
//! - **Original**: every filterable chip that is not selected
//! - **Filtered**: the chips currently offered for selection (mirrors original)
//! - **Selected**: the chips the user picked, in selection order
//!
//! # Example
//!
//! ```
//! use chipstore::{Chip, ChipStore};
//!
//! let store = ChipStore::new();
//! store.load(vec![Chip::with_id("b", "Bravo"), Chip::with_id("a", "Alpha")]).unwrap();
//! let alpha = store.select_at(0).unwrap();
//! assert_eq!(alpha.title, "Alpha");
//! assert_eq!(store.selected().len(), 1);
//! ```

mod chip;
pub mod config;

pub use chip::{
    ChangeObserver, Chip, ChipError, ChipId, ChipResult, ChipStore, ObserverId, Partition,
    PartitionSnapshot, SelectionObserver,
};
pub use config::{ConfigError, ReinsertPolicy, StoreConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

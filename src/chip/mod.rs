//! Chip entities, the partition store and its observers

mod entity;
mod observer;
mod partition;
mod store;


pub use entity::{Chip, ChipId};
pub use observer::{ChangeObserver, ObserverId, SelectionObserver};
pub use partition::{Partition, PartitionSnapshot};
pub use store::{ChipError, ChipResult, ChipStore};

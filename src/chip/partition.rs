//! The three chip partitions and their snapshot view

use super::entity::Chip;
use serde::{Deserialize, Serialize};

/// One of the store's mutually exclusive chip collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    /// Every filterable chip that is not selected
    Original,
    /// Chips currently offered for selection (mirrors `Original`)
    Filtered,
    /// Chips the user selected, in selection order
    Selected,
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Original => write!(f, "original"),
            Self::Filtered => write!(f, "filtered"),
            Self::Selected => write!(f, "selected"),
        }
    }
}

/// Owned copy of all three partitions at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartitionSnapshot {
    pub original: Vec<Chip>,
    pub filtered: Vec<Chip>,
    pub selected: Vec<Chip>,
}

impl PartitionSnapshot {
    /// Chips in the given partition
    pub fn get(&self, partition: Partition) -> &[Chip] {
        match partition {
            Partition::Original => &self.original,
            Partition::Filtered => &self.filtered,
            Partition::Selected => &self.selected,
        }
    }
}

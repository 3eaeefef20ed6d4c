//! Observer contracts for store notifications
//!
//! Two kinds of observers watch a [`ChipStore`](super::ChipStore):
//! - a single selection observer, told which chip entered or left the
//!   selected partition
//! - any number of change observers, told only that something changed
//!   (they re-query the store for the new state)

use super::entity::Chip;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Watches chips entering and leaving the selected partition.
pub trait SelectionObserver: Send + Sync {
    /// A chip was appended to the selected partition
    fn on_chip_added(&self, chip: &Chip);

    /// A chip was removed from the selected partition
    fn on_chip_removed(&self, chip: &Chip);
}

/// Watches for any change to the store's partitions.
pub trait ChangeObserver: Send + Sync {
    /// Some partition changed; re-query the store for the new state
    fn on_chips_changed(&self);
}

impl<F> ChangeObserver for F
where
    F: Fn() + Send + Sync,
{
    fn on_chips_changed(&self) {
        self()
    }
}

/// Handle for a registered change observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverId(Uuid);

impl ObserverId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification produced by a committed mutation, dispatched after the
/// state lock is released.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SelectionEvent {
    Added(Chip),
    Removed(Chip),
}

impl SelectionEvent {
    pub(crate) fn dispatch(&self, observer: &dyn SelectionObserver) {
        match self {
            Self::Added(chip) => observer.on_chip_added(chip),
            Self::Removed(chip) => observer.on_chip_removed(chip),
        }
    }
}

/// Registered observers: at most one selection observer, and change
/// observers kept in registration order.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    selection: Option<Arc<dyn SelectionObserver>>,
    changes: Vec<(ObserverId, Arc<dyn ChangeObserver>)>,
}

impl ObserverRegistry {
    /// Install the selection observer, returning the one it displaces
    pub(crate) fn replace_selection(
        &mut self,
        observer: Option<Arc<dyn SelectionObserver>>,
    ) -> Option<Arc<dyn SelectionObserver>> {
        std::mem::replace(&mut self.selection, observer)
    }

    pub(crate) fn add_change(&mut self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        let id = ObserverId::new();
        self.changes.push((id, observer));
        id
    }

    pub(crate) fn remove_change(&mut self, id: ObserverId) -> bool {
        let before = self.changes.len();
        self.changes.retain(|(existing, _)| *existing != id);
        self.changes.len() != before
    }

    pub(crate) fn clear_changes(&mut self) {
        self.changes.clear();
    }

    pub(crate) fn change_count(&self) -> usize {
        self.changes.len()
    }

    /// Clone out the current observers so dispatch can run unlocked
    pub(crate) fn snapshot(&self) -> Dispatch {
        Dispatch {
            selection: self.selection.clone(),
            changes: self.changes.iter().map(|(_, o)| Arc::clone(o)).collect(),
        }
    }
}

/// Observers captured at commit time
pub(crate) struct Dispatch {
    selection: Option<Arc<dyn SelectionObserver>>,
    changes: Vec<Arc<dyn ChangeObserver>>,
}

impl Dispatch {
    /// Selection observer first, then every change observer in order.
    pub(crate) fn notify(&self, event: &SelectionEvent) {
        if let Some(observer) = &self.selection {
            event.dispatch(observer.as_ref());
        }
        for observer in &self.changes {
            observer.on_chips_changed();
        }
    }
}

//! ChipStore: owns the original, filtered and selected partitions

use super::entity::{Chip, ChipId};
use super::observer::{
    ChangeObserver, ObserverId, ObserverRegistry, SelectionEvent, SelectionObserver,
};
use super::partition::{Partition, PartitionSnapshot};
use crate::config::{ReinsertPolicy, StoreConfig};
use parking_lot::ReentrantMutex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Errors that can occur in store operations
#[derive(Debug, Error, PartialEq)]
pub enum ChipError {
    #[error("Chip is missing (blank identity)")]
    MissingChip,

    #[error("Chip {id} is not in the {partition} partition")]
    NotInPartition { id: ChipId, partition: Partition },

    #[error("Chip {id} is already selected")]
    AlreadySelected { id: ChipId },

    #[error("Position {index} is out of range for the {partition} partition (len {len})")]
    OutOfRange {
        partition: Partition,
        index: usize,
        len: usize,
    },
}

/// Result type for store operations
pub type ChipResult<T> = Result<T, ChipError>;

fn ensure_present(chip: &Chip) -> ChipResult<()> {
    if chip.id.is_blank() {
        return Err(ChipError::MissingChip);
    }
    Ok(())
}

fn position_of(chips: &[Chip], id: &ChipId) -> Option<usize> {
    chips.iter().position(|c| &c.id == id)
}

fn out_of_range(partition: Partition, index: usize, len: usize) -> ChipError {
    ChipError::OutOfRange {
        partition,
        index,
        len,
    }
}

/// The three partitions. Original and filtered always hold the same chips.
#[derive(Debug, Default)]
struct Partitions {
    original: Vec<Chip>,
    filtered: Vec<Chip>,
    selected: Vec<Chip>,
}

impl Partitions {
    fn list(&self, partition: Partition) -> &[Chip] {
        match partition {
            Partition::Original => &self.original,
            Partition::Filtered => &self.filtered,
            Partition::Selected => &self.selected,
        }
    }

    fn reset(&mut self, chips: Vec<Chip>) {
        let mut sorted = chips;
        sorted.sort_by(Chip::natural_cmp);
        self.original = sorted.clone();
        self.filtered = sorted;
        self.selected = Vec::with_capacity(self.original.len());
    }

    /// Move the filtered chip at `index` to the end of the selected partition
    fn take_filtered(&mut self, index: usize) -> Chip {
        let chip = self.filtered.remove(index);
        if let Some(at) = position_of(&self.original, &chip.id) {
            self.original.remove(at);
        }
        self.selected.push(chip.clone());
        chip
    }

    fn select(&mut self, chip: &Chip) -> ChipResult<Chip> {
        if let Some(index) = position_of(&self.filtered, &chip.id) {
            return Ok(self.take_filtered(index));
        }
        if chip.is_filterable() {
            return Err(ChipError::NotInPartition {
                id: chip.id.clone(),
                partition: Partition::Filtered,
            });
        }
        if position_of(&self.selected, &chip.id).is_some() {
            return Err(ChipError::AlreadySelected {
                id: chip.id.clone(),
            });
        }
        self.selected.push(chip.clone());
        Ok(chip.clone())
    }

    fn select_at(&mut self, index: usize) -> ChipResult<Chip> {
        if index >= self.filtered.len() {
            return Err(out_of_range(Partition::Filtered, index, self.filtered.len()));
        }
        Ok(self.take_filtered(index))
    }

    /// Remove the selected chip at `index`; filterable chips go back to
    /// filtered and original, others are dropped.
    fn release(&mut self, index: usize, policy: ReinsertPolicy) -> Chip {
        let chip = self.selected.remove(index);
        if chip.is_filterable() {
            reinsert(&mut self.filtered, chip.clone(), policy);
            reinsert(&mut self.original, chip.clone(), policy);
        }
        chip
    }

    fn deselect(&mut self, chip: &Chip, policy: ReinsertPolicy) -> ChipResult<Chip> {
        let index =
            position_of(&self.selected, &chip.id).ok_or_else(|| ChipError::NotInPartition {
                id: chip.id.clone(),
                partition: Partition::Selected,
            })?;
        Ok(self.release(index, policy))
    }

    fn deselect_at(&mut self, index: usize, policy: ReinsertPolicy) -> ChipResult<Chip> {
        if index >= self.selected.len() {
            return Err(out_of_range(Partition::Selected, index, self.selected.len()));
        }
        Ok(self.release(index, policy))
    }

    fn contains(&self, id: &ChipId) -> bool {
        [&self.original, &self.filtered, &self.selected]
            .iter()
            .any(|chips| position_of(chips, id).is_some())
    }
}

fn reinsert(chips: &mut Vec<Chip>, chip: Chip, policy: ReinsertPolicy) {
    match policy {
        ReinsertPolicy::Append => chips.push(chip),
        ReinsertPolicy::Sorted => {
            let at = chips.partition_point(|c| c.natural_cmp(&chip) == Ordering::Less);
            chips.insert(at, chip);
        }
    }
}

#[derive(Default)]
struct State {
    partitions: Partitions,
    observers: ObserverRegistry,
}

/// In-memory chip partition store
///
/// Tracks chips across three mutually exclusive partitions and notifies
/// observers after every selection change. A single lock guards the
/// partitions and the observer registrations. Every mutation takes the
/// reentrant dispatch lock first and holds it through notification, so
/// observers see events in commit order. Observers run with the state lock
/// released and may query or mutate the store from a callback; a nested
/// mutation is notified before the outer dispatch continues.
#[derive(Default)]
pub struct ChipStore {
    config: StoreConfig,
    state: Mutex<State>,
    dispatch: ReentrantMutex<()>,
}

impl std::fmt::Debug for ChipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ChipStore")
            .field("config", &self.config)
            .field("partitions", &state.partitions)
            .field("change_observers", &state.observers.change_count())
            .finish_non_exhaustive()
    }
}

impl ChipStore {
    /// Create an empty store with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with the given configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // Observers never run under this lock; poisoning is recovered, not propagated.
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a mutation under the state lock, then notify observers with
    /// the event it produced.
    ///
    /// Lock order is always dispatch, then state.
    fn commit<F>(&self, mutate: F) -> ChipResult<Chip>
    where
        F: FnOnce(&mut Partitions) -> ChipResult<SelectionEvent>,
    {
        let _serial = self.dispatch.lock();
        let (event, dispatch) = {
            let mut state = self.lock();
            let event = mutate(&mut state.partitions)?;
            (event, state.observers.snapshot())
        };
        let chip = match &event {
            SelectionEvent::Added(chip) | SelectionEvent::Removed(chip) => chip.clone(),
        };
        dispatch.notify(&event);
        Ok(chip)
    }

    // --- Mutation ---

    /// Replace all state with the given chips
    ///
    /// Every chip becomes filterable and lands in both the original and the
    /// filtered partition in natural order; the selected partition is
    /// cleared. Chips repeating an earlier id are dropped. Observers are not
    /// notified.
    pub fn load(&self, chips: impl IntoIterator<Item = Chip>) -> ChipResult<()> {
        let mut seen = HashSet::new();
        let mut accepted = Vec::new();
        for mut chip in chips {
            ensure_present(&chip)?;
            if !seen.insert(chip.id.clone()) {
                tracing::warn!(chip = %chip.id, "dropping duplicate chip on load");
                continue;
            }
            chip.filterable = true;
            accepted.push(chip);
        }

        let count = accepted.len();
        self.lock().partitions.reset(accepted);
        tracing::debug!(count, "loaded chips");
        Ok(())
    }

    /// Select a chip by identity
    ///
    /// A chip found in the filtered partition moves from original and
    /// filtered to the end of selected. A non-filterable chip is appended to
    /// selected directly. Returns the chip as stored.
    pub fn select_chip(&self, chip: &Chip) -> ChipResult<Chip> {
        ensure_present(chip)?;
        let selected = self.commit(|p| p.select(chip).map(SelectionEvent::Added))?;
        tracing::debug!(chip = %selected.id, filterable = selected.is_filterable(), "selected chip");
        Ok(selected)
    }

    /// Select the chip at `index` in the filtered partition
    pub fn select_at(&self, index: usize) -> ChipResult<Chip> {
        let selected = self.commit(|p| p.select_at(index).map(SelectionEvent::Added))?;
        tracing::debug!(chip = %selected.id, index, "selected chip by position");
        Ok(selected)
    }

    /// Deselect a chip by identity
    ///
    /// Filterable chips return to the filtered and original partitions
    /// (placement per [`ReinsertPolicy`]); non-filterable chips are dropped.
    pub fn deselect_chip(&self, chip: &Chip) -> ChipResult<Chip> {
        ensure_present(chip)?;
        let policy = self.config.reinsert;
        let removed = self.commit(|p| p.deselect(chip, policy).map(SelectionEvent::Removed))?;
        tracing::debug!(chip = %removed.id, filterable = removed.is_filterable(), "deselected chip");
        Ok(removed)
    }

    /// Deselect the chip at `index` in the selected partition
    pub fn deselect_at(&self, index: usize) -> ChipResult<Chip> {
        let policy = self.config.reinsert;
        let removed = self.commit(|p| p.deselect_at(index, policy).map(SelectionEvent::Removed))?;
        tracing::debug!(chip = %removed.id, index, "deselected chip by position");
        Ok(removed)
    }

    // --- Query ---

    /// True if the chip's identity is in any partition
    pub fn contains(&self, chip: &Chip) -> ChipResult<bool> {
        ensure_present(chip)?;
        Ok(self.lock().partitions.contains(&chip.id))
    }

    pub fn is_selected(&self, id: &ChipId) -> bool {
        position_of(&self.lock().partitions.selected, id).is_some()
    }

    pub fn original(&self) -> Vec<Chip> {
        self.lock().partitions.original.clone()
    }

    pub fn filtered(&self) -> Vec<Chip> {
        self.lock().partitions.filtered.clone()
    }

    pub fn selected(&self) -> Vec<Chip> {
        self.lock().partitions.selected.clone()
    }

    pub fn filtered_chip(&self, index: usize) -> ChipResult<Chip> {
        self.chip_at(Partition::Filtered, index)
    }

    pub fn selected_chip(&self, index: usize) -> ChipResult<Chip> {
        self.chip_at(Partition::Selected, index)
    }

    fn chip_at(&self, partition: Partition, index: usize) -> ChipResult<Chip> {
        let state = self.lock();
        let chips = state.partitions.list(partition);
        chips
            .get(index)
            .cloned()
            .ok_or_else(|| out_of_range(partition, index, chips.len()))
    }

    /// Number of chips in a partition
    pub fn len(&self, partition: Partition) -> usize {
        self.lock().partitions.list(partition).len()
    }

    /// Copy all three partitions under a single lock acquisition
    pub fn snapshot(&self) -> PartitionSnapshot {
        let state = self.lock();
        PartitionSnapshot {
            original: state.partitions.original.clone(),
            filtered: state.partitions.filtered.clone(),
            selected: state.partitions.selected.clone(),
        }
    }

    // --- Observers ---

    /// Install the selection observer, returning the one it replaces
    pub fn set_selection_observer(
        &self,
        observer: Arc<dyn SelectionObserver>,
    ) -> Option<Arc<dyn SelectionObserver>> {
        self.lock().observers.replace_selection(Some(observer))
    }

    /// Remove the selection observer, returning it if one was installed
    pub fn clear_selection_observer(&self) -> Option<Arc<dyn SelectionObserver>> {
        self.lock().observers.replace_selection(None)
    }

    pub fn add_change_observer(&self, observer: Arc<dyn ChangeObserver>) -> ObserverId {
        self.lock().observers.add_change(observer)
    }

    /// Unregister a change observer; false if the id is unknown
    pub fn remove_change_observer(&self, id: ObserverId) -> bool {
        self.lock().observers.remove_change(id)
    }

    pub fn remove_all_change_observers(&self) {
        self.lock().observers.clear_changes();
    }

    pub fn change_observer_count(&self) -> usize {
        self.lock().observers.change_count()
    }
}

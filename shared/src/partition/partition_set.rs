use std::collections::HashMap;

use crate::{
    partition::{
        error::PartitionError,
        partition_state::{LoadMode, PartitionState},
    },
    types::PartitionId,
};

struct PartitionRecord {
    state: PartitionState,
    mode: LoadMode,
}

/// Every partition the session knows about, keyed by id, plus the order in
/// which they finished loading.
///
/// A partition id maps to exactly one state, so at most one transition per id
/// can be outstanding.
pub struct PartitionSet {
    records: HashMap<PartitionId, PartitionRecord>,
    // loaded ids, the Reset partition (if loaded) always first
    load_order: Vec<PartitionId>,
}

impl PartitionSet {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            load_order: Vec::new(),
        }
    }

    pub fn state(&self, id: PartitionId) -> Option<PartitionState> {
        self.records.get(&id).map(|record| record.state)
    }

    pub fn load_mode(&self, id: PartitionId) -> Option<LoadMode> {
        self.records.get(&id).map(|record| record.mode)
    }

    pub fn contains(&self, id: PartitionId) -> bool {
        self.records.contains_key(&id)
    }

    pub fn is_loading(&self, id: PartitionId) -> bool {
        self.state(id) == Some(PartitionState::Loading)
    }

    pub fn is_loaded(&self, id: PartitionId) -> bool {
        self.state(id) == Some(PartitionState::Loaded)
    }

    pub fn any_loading(&self) -> bool {
        self.records
            .values()
            .any(|record| record.state == PartitionState::Loading)
    }

    /// Whether a non-additive load is still in progress. While it is, no
    /// object creation is dispatched for any partition.
    pub fn reset_in_progress(&self) -> bool {
        self.records
            .values()
            .any(|record| record.state == PartitionState::Loading && record.mode == LoadMode::Reset)
    }

    /// Loaded partitions, in the order they finished loading
    pub fn loaded(&self) -> &[PartitionId] {
        &self.load_order
    }

    /// Ids currently loading, sorted
    pub fn loading(&self) -> Vec<PartitionId> {
        let mut ids: Vec<PartitionId> = self
            .records
            .iter()
            .filter(|(_, record)| record.state == PartitionState::Loading)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// The partitions a newly joined peer needs, each with the mode it should
    /// apply: loaded partitions in load order, the first one as a Reset and
    /// the rest as Add. Partitions still loading are announced to everyone
    /// once they finish.
    pub fn bootstrap_order(&self) -> Vec<(PartitionId, LoadMode)> {
        self.load_order
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let mode = if index == 0 { LoadMode::Reset } else { LoadMode::Add };
                (*id, mode)
            })
            .collect()
    }

    /// Drops every partition and marks `id` as loading non-additively. Always
    /// succeeds, whatever state `id` was in before.
    pub fn begin_reset(&mut self, id: PartitionId) {
        self.clear();
        self.records.insert(
            id,
            PartitionRecord {
                state: PartitionState::Loading,
                mode: LoadMode::Reset,
            },
        );
    }

    pub fn begin_add(&mut self, id: PartitionId) -> Result<(), PartitionError> {
        if let Some(record) = self.records.get(&id) {
            return Err(match record.state {
                PartitionState::Loaded => PartitionError::AlreadyLoaded { id },
                state => PartitionError::TransitionOutstanding { id, state },
            });
        }

        self.records.insert(
            id,
            PartitionRecord {
                state: PartitionState::Loading,
                mode: LoadMode::Add,
            },
        );
        Ok(())
    }

    /// Moves a loading partition to Loaded and returns how it was loaded
    pub fn complete_load(&mut self, id: PartitionId) -> Result<LoadMode, PartitionError> {
        let Some(record) = self.records.get_mut(&id) else {
            return Err(PartitionError::UnknownPartition { id });
        };
        if record.state != PartitionState::Loading {
            return Err(PartitionError::UnexpectedState {
                id,
                state: record.state,
                expected: PartitionState::Loading,
            });
        }

        record.state = PartitionState::Loaded;
        let mode = record.mode;
        match mode {
            LoadMode::Reset => self.load_order.insert(0, id),
            LoadMode::Add => self.load_order.push(id),
        }

        Ok(mode)
    }

    /// Starts unloading a partition that is loaded, or cancels one that is
    /// still loading. Returns the state it left.
    pub fn begin_remove(&mut self, id: PartitionId) -> Result<PartitionState, PartitionError> {
        let Some(record) = self.records.get_mut(&id) else {
            return Err(PartitionError::UnknownPartition { id });
        };
        let previous = record.state;
        if previous == PartitionState::Unloading {
            return Err(PartitionError::TransitionOutstanding {
                id,
                state: previous,
            });
        }

        record.state = PartitionState::Unloading;
        self.load_order.retain(|loaded| *loaded != id);

        Ok(previous)
    }

    /// Forgets an unloading partition so its id can be used again
    pub fn complete_unload(&mut self, id: PartitionId) -> Result<(), PartitionError> {
        let Some(record) = self.records.get(&id) else {
            return Err(PartitionError::UnknownPartition { id });
        };
        if record.state != PartitionState::Unloading {
            return Err(PartitionError::UnexpectedState {
                id,
                state: record.state,
                expected: PartitionState::Unloading,
            });
        }

        self.records.remove(&id);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.load_order.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for PartitionSet {
    fn default() -> Self {
        Self::new()
    }
}

use std::collections::HashSet;

use vista_shared::{PartitionId, PartitionMode};

/// What the server knows about one connected peer
pub(crate) struct PeerRecord {
    // partitions the peer reported as loaded
    acknowledged: HashSet<PartitionId>,
}

impl PeerRecord {
    pub fn new() -> Self {
        Self {
            acknowledged: HashSet::new(),
        }
    }

    pub fn record_ack(&mut self, id: PartitionId, mode: PartitionMode) {
        match mode {
            PartitionMode::Reset => {
                self.acknowledged.clear();
                self.acknowledged.insert(id);
            }
            PartitionMode::Add => {
                self.acknowledged.insert(id);
            }
            PartitionMode::Remove => {
                self.acknowledged.remove(&id);
            }
        }
    }

    /// Acknowledged partitions, sorted
    pub fn partitions(&self) -> Vec<PartitionId> {
        let mut ids: Vec<PartitionId> = self.acknowledged.iter().copied().collect();
        ids.sort_unstable();
        ids
    }
}

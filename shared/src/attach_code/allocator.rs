use std::collections::HashMap;

use crate::{
    attach_code::{attach_code::AttachCode, error::AttachCodeError},
    types::PartitionId,
};

/// Hands out pending attach codes, one monotonic sequence per partition.
///
/// Both ends of a session discover a partition's behaviors in the same
/// deterministic order and number them from 1, so a sequence restarts every
/// time the partition begins a new loading generation.
pub struct AttachCodeAllocator {
    next_sequence: HashMap<PartitionId, u16>,
}

impl AttachCodeAllocator {
    pub fn new() -> Self {
        Self {
            next_sequence: HashMap::new(),
        }
    }

    pub fn allocate(&mut self, partition: PartitionId) -> Result<AttachCode, AttachCodeError> {
        if partition > AttachCode::MAX_PARTITION_ID {
            return Err(AttachCodeError::PartitionIdOutOfRange {
                id: partition,
                max: AttachCode::MAX_PARTITION_ID,
            });
        }

        let next = self.next_sequence.entry(partition).or_insert(1);
        if *next == 0 {
            // wrapped past u16::MAX on the previous allocation
            return Err(AttachCodeError::SequenceExhausted { partition });
        }

        let code = AttachCode::pending(partition, *next)?;
        *next = next.wrapping_add(1);

        Ok(code)
    }

    /// Restarts numbering for `partition` at 1
    pub fn reset(&mut self, partition: PartitionId) {
        self.next_sequence.remove(&partition);
    }

    pub fn clear(&mut self) {
        self.next_sequence.clear();
    }

    /// Whether no partition has a generation in progress
    pub fn is_empty(&self) -> bool {
        self.next_sequence.is_empty()
    }

    /// Number of codes handed out for `partition` in its current generation
    pub fn allocated(&self, partition: PartitionId) -> u32 {
        match self.next_sequence.get(&partition) {
            None => 0,
            Some(0) => u32::from(u16::MAX),
            Some(next) => u32::from(*next) - 1,
        }
    }
}

impl Default for AttachCodeAllocator {
    fn default() -> Self {
        Self::new()
    }
}

use thiserror::Error;

use crate::types::PartitionId;

/// Errors that can occur while building or allocating attach codes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachCodeError {
    /// Partition id does not fit in the 15 bits an attach code reserves for it
    #[error("Partition id {id} is out of range for attach codes (maximum is {max})")]
    PartitionIdOutOfRange { id: PartitionId, max: PartitionId },

    /// Sequence 0 is never handed out, it would collide with the partition-only prefix
    #[error("Attach code sequence must start at 1 (partition {partition})")]
    ZeroSequence { partition: PartitionId },

    /// Every sequence number of one loading generation has been handed out
    #[error("Attach code sequence exhausted for partition {partition}. A single load cannot discover more than 65535 behaviors")]
    SequenceExhausted { partition: PartitionId },
}

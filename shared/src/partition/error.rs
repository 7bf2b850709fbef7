use thiserror::Error;

use crate::{
    attach_code::attach_code::AttachCode,
    partition::partition_state::PartitionState,
    types::PartitionId,
};

/// Errors that can occur when a partition transition is requested
///
/// These are rejections, not failures: a rejected transition leaves the
/// partition set untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    /// Another transition for this id has not finished yet
    #[error("Partition {id} already has a transition outstanding (currently {state:?})")]
    TransitionOutstanding { id: PartitionId, state: PartitionState },

    /// The partition is already loaded, an additive load would duplicate it
    #[error("Partition {id} is already loaded")]
    AlreadyLoaded { id: PartitionId },

    /// The partition id is not part of the session
    #[error("Partition {id} is not part of the session")]
    UnknownPartition { id: PartitionId },

    /// The operation requires a different lifecycle state
    #[error("Partition {id} is {state:?}, expected {expected:?}")]
    UnexpectedState {
        id: PartitionId,
        state: PartitionState,
        expected: PartitionState,
    },

    /// Pending (negative) attach codes are allocated by the session, never requested
    #[error("Attach code {code} is reserved for scene behaviors and cannot be requested")]
    ReservedAttachCode { code: AttachCode },
}

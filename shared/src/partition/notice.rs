use crate::types::PartitionId;

/// A request for the embedding application to load or unload its own
/// resources for a partition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PartitionNotice {
    /// Load `id` replacing everything else
    Reset(PartitionId),
    /// Load `id` next to what is already loaded
    Added(PartitionId),
    /// Unload `id`
    Removed(PartitionId),
}

impl PartitionNotice {
    pub fn partition(&self) -> PartitionId {
        match self {
            PartitionNotice::Reset(id)
            | PartitionNotice::Added(id)
            | PartitionNotice::Removed(id) => *id,
        }
    }
}

use std::fmt;

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{attach_code::error::AttachCodeError, types::PartitionId};

/// Correlation key binding a locally pending behavior to the network object
/// that will eventually represent it.
///
/// Negative values are reserved for creations that have not been
/// acknowledged yet and are encoded as `-((partition << 16) | sequence)`.
/// Non-negative values are ordinary create codes for objects that are
/// already known network-wide.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttachCode(i32);

impl AttachCode {
    pub const MAX_PARTITION_ID: PartitionId = 0x7FFF;

    /// Builds the pending code for `sequence` within `partition`
    pub fn pending(partition: PartitionId, sequence: u16) -> Result<Self, AttachCodeError> {
        if partition > Self::MAX_PARTITION_ID {
            return Err(AttachCodeError::PartitionIdOutOfRange {
                id: partition,
                max: Self::MAX_PARTITION_ID,
            });
        }
        if sequence == 0 {
            return Err(AttachCodeError::ZeroSequence { partition });
        }

        let raw = (i32::from(partition) << 16) | i32::from(sequence);
        Ok(Self(-raw))
    }

    pub fn from_i32(value: i32) -> Self {
        Self(value)
    }

    pub fn to_i32(&self) -> i32 {
        self.0
    }

    /// Whether this code belongs to a not-yet-acknowledged local creation
    pub fn is_pending(&self) -> bool {
        self.0 < 0
    }

    /// The partition a pending code was allocated for. `None` for
    /// non-negative codes, which carry no partition.
    pub fn partition_id(&self) -> Option<PartitionId> {
        let raw = self.pending_raw()?;
        u16::try_from(raw >> 16).ok()
    }

    /// The sequence number of a pending code within its partition
    pub fn sequence(&self) -> Option<u16> {
        let raw = self.pending_raw()?;
        u16::try_from(raw & 0xFFFF).ok()
    }

    fn pending_raw(&self) -> Option<i32> {
        if !self.is_pending() {
            return None;
        }
        self.0.checked_neg()
    }
}

impl fmt::Display for AttachCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.partition_id(), self.sequence()) {
            (Some(partition), Some(sequence)) => {
                write!(f, "{} (partition {}, seq {})", self.0, partition, sequence)
            }
            _ => write!(f, "{}", self.0),
        }
    }
}

impl Serde for AttachCode {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.0.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self(i32::de(reader)?))
    }

    fn bit_length(&self) -> u32 {
        self.0.bit_length()
    }
}

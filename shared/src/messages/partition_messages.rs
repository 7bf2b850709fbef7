use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    partition::partition_state::{ChangeMode, LoadMode, PartitionMode},
    types::PartitionId,
};

/// Replace every loaded partition with `id`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionReset {
    pub id: PartitionId,
}

impl Serde for PartitionReset {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id: PartitionId::de(reader)?,
        })
    }

    fn bit_length(&self) -> u32 {
        self.id.bit_length()
    }
}

/// Additively load, or unload, partition `id`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionChange {
    pub id: PartitionId,
    pub mode: ChangeMode,
}

impl Serde for PartitionChange {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
        self.mode.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let id = PartitionId::de(reader)?;
        let mode = ChangeMode::de(reader)?;
        Ok(Self { id, mode })
    }

    fn bit_length(&self) -> u32 {
        self.id.bit_length() + self.mode.bit_length()
    }
}

/// Sent only to a newly accepted peer, once per partition the session
/// already has. The first one carries `LoadMode::Reset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionInit {
    pub id: PartitionId,
    pub mode: LoadMode,
}

impl Serde for PartitionInit {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
        self.mode.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let id = PartitionId::de(reader)?;
        let mode = LoadMode::de(reader)?;
        Ok(Self { id, mode })
    }

    fn bit_length(&self) -> u32 {
        self.id.bit_length() + self.mode.bit_length()
    }
}

/// Client acknowledgement that a requested transition finished locally
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionAck {
    pub id: PartitionId,
    pub mode: PartitionMode,
}

impl Serde for PartitionAck {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
        self.mode.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let id = PartitionId::de(reader)?;
        let mode = PartitionMode::de(reader)?;
        Ok(Self { id, mode })
    }

    fn bit_length(&self) -> u32 {
        self.id.bit_length() + self.mode.bit_length()
    }
}

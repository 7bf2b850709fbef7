use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{
    attach_code::attach_code::AttachCode,
    types::{NetworkId, PartitionId},
};

/// Announces that a network object exists. `create_code` is the attach code
/// of the scene behavior it stands for, or a non-negative create code for
/// objects spawned at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectCreate {
    pub network_id: NetworkId,
    pub create_code: AttachCode,
    pub partition: PartitionId,
}

impl Serde for ObjectCreate {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.network_id.ser(writer);
        self.create_code.ser(writer);
        self.partition.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let network_id = NetworkId::de(reader)?;
        let create_code = AttachCode::de(reader)?;
        let partition = PartitionId::de(reader)?;
        Ok(Self {
            network_id,
            create_code,
            partition,
        })
    }

    fn bit_length(&self) -> u32 {
        self.network_id.bit_length() + self.create_code.bit_length() + self.partition.bit_length()
    }
}

/// Asks the server to instantiate an object; the server picks the network id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectCreateRequest {
    pub create_code: AttachCode,
    pub partition: PartitionId,
}

impl Serde for ObjectCreateRequest {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.create_code.ser(writer);
        self.partition.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let create_code = AttachCode::de(reader)?;
        let partition = PartitionId::de(reader)?;
        Ok(Self {
            create_code,
            partition,
        })
    }

    fn bit_length(&self) -> u32 {
        self.create_code.bit_length() + self.partition.bit_length()
    }
}

use naia_serde::{BitReader, BitWriter, Serde};

use crate::messages::{
    constants::{
        MessageGroupId, OBJECT_CREATE, OBJECT_CREATE_REQUEST, PARTITION_ACK, PARTITION_CHANGE,
        PARTITION_INIT, PARTITION_RESET,
    },
    error::FrameError,
    frame::Frame,
    object_messages::{ObjectCreate, ObjectCreateRequest},
    partition_messages::{PartitionAck, PartitionChange, PartitionInit, PartitionReset},
};

/// Every frame the session layer itself sends or handles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionMessage {
    PartitionInit(PartitionInit),
    PartitionReset(PartitionReset),
    PartitionChange(PartitionChange),
    PartitionAck(PartitionAck),
    ObjectCreate(ObjectCreate),
    ObjectCreateRequest(ObjectCreateRequest),
}

impl SessionMessage {
    pub fn group(&self) -> MessageGroupId {
        match self {
            SessionMessage::PartitionInit(_) => PARTITION_INIT,
            SessionMessage::PartitionReset(_) => PARTITION_RESET,
            SessionMessage::PartitionChange(_) => PARTITION_CHANGE,
            SessionMessage::PartitionAck(_) => PARTITION_ACK,
            SessionMessage::ObjectCreate(_) => OBJECT_CREATE,
            SessionMessage::ObjectCreateRequest(_) => OBJECT_CREATE_REQUEST,
        }
    }

    pub fn to_frame(&self) -> Frame {
        let mut writer = BitWriter::new();
        match self {
            SessionMessage::PartitionInit(message) => message.ser(&mut writer),
            SessionMessage::PartitionReset(message) => message.ser(&mut writer),
            SessionMessage::PartitionChange(message) => message.ser(&mut writer),
            SessionMessage::PartitionAck(message) => message.ser(&mut writer),
            SessionMessage::ObjectCreate(message) => message.ser(&mut writer),
            SessionMessage::ObjectCreateRequest(message) => message.ser(&mut writer),
        }
        Frame::new(self.group(), writer.to_bytes())
    }

    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        let group = frame.group();
        let malformed = || FrameError::MalformedPayload {
            group,
            payload_size: frame.payload().len(),
        };
        let mut reader = BitReader::new(frame.payload());

        let message = match group {
            PARTITION_INIT => {
                SessionMessage::PartitionInit(PartitionInit::de(&mut reader).map_err(|_| malformed())?)
            }
            PARTITION_RESET => SessionMessage::PartitionReset(
                PartitionReset::de(&mut reader).map_err(|_| malformed())?,
            ),
            PARTITION_CHANGE => SessionMessage::PartitionChange(
                PartitionChange::de(&mut reader).map_err(|_| malformed())?,
            ),
            PARTITION_ACK => {
                SessionMessage::PartitionAck(PartitionAck::de(&mut reader).map_err(|_| malformed())?)
            }
            OBJECT_CREATE => {
                SessionMessage::ObjectCreate(ObjectCreate::de(&mut reader).map_err(|_| malformed())?)
            }
            OBJECT_CREATE_REQUEST => SessionMessage::ObjectCreateRequest(
                ObjectCreateRequest::de(&mut reader).map_err(|_| malformed())?,
            ),
            _ => return Err(FrameError::UnknownGroup { group }),
        };

        Ok(message)
    }
}

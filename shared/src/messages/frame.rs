use crate::messages::constants::{is_reserved_group, MessageGroupId};

/// A unit of data exchanged through the transport: a message group id that
/// decides who handles it, and an opaque payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    group: MessageGroupId,
    payload: Box<[u8]>,
}

impl Frame {
    pub fn new(group: MessageGroupId, payload: Box<[u8]>) -> Self {
        Self { group, payload }
    }

    pub fn group(&self) -> MessageGroupId {
        self.group
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_payload(self) -> Box<[u8]> {
        self.payload
    }

    /// Whether this frame belongs to the session layer rather than the application
    pub fn is_session_frame(&self) -> bool {
        is_reserved_group(self.group)
    }
}

use thiserror::Error;

use crate::messages::constants::MessageGroupId;

/// Errors that can occur while decoding or routing a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Reserved message group that this version of the session layer does not know
    #[error("Unknown session message group {group}. The peer may be running an incompatible version")]
    UnknownGroup { group: MessageGroupId },

    /// Payload could not be read for the given group (SECURITY: potentially malicious frame)
    #[error("Malformed payload of {payload_size} bytes for message group {group}")]
    MalformedPayload {
        group: MessageGroupId,
        payload_size: usize,
    },

    /// Application frames cannot use groups reserved by the session layer
    #[error("Message group {group} is reserved by the session layer. Application groups start at {start}")]
    ReservedGroup {
        group: MessageGroupId,
        start: MessageGroupId,
    },
}

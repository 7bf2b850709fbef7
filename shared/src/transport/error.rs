use thiserror::Error;

/// The transport could not deliver a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed to send frame")]
pub struct SendError;

/// The transport failed while polling for incoming events
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed to receive")]
pub struct RecvError;

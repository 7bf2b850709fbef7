use thiserror::Error;

use vista_shared::{ConfigError, FrameError, PartitionError};

/// Errors the client reports, either returned from a call or surfaced as an
/// [`ErrorEvent`](crate::ErrorEvent) on the next `receive()`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VistaClientError {
    /// The configuration was rejected at construction
    #[error("Invalid client configuration: {0}")]
    Config(#[from] ConfigError),

    /// The transport refused a frame
    #[error("Could not send frame to the server")]
    SendError,

    /// The transport failed while polling for events
    #[error("Error receiving from the transport")]
    RecvError,

    /// The server sent a session frame that does not decode
    #[error("Undecodable frame from the server: {0}")]
    Decode(FrameError),

    /// An outgoing frame was rejected before it reached the transport
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A partition operation was rejected
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// `ClientConfig::directory` is not set
    #[error("No directory is configured")]
    NoDirectory,
}

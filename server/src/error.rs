use thiserror::Error;

use vista_shared::{ConfigError, FrameError, PartitionError, PeerId, Recipient};

/// Errors the server reports, either returned from a call or surfaced as an
/// [`ErrorEvent`](crate::ErrorEvent) on the next `receive()`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VistaServerError {
    /// The configuration was rejected at construction
    #[error("Invalid server configuration: {0}")]
    Config(#[from] ConfigError),

    /// The transport refused a frame
    #[error("Could not send frame to {0:?}")]
    SendError(Recipient),

    /// The transport failed while polling for events
    #[error("Error receiving from the transport")]
    RecvError,

    /// A peer sent a session frame that does not decode
    #[error("Undecodable frame from peer {peer}: {source}")]
    Decode { peer: PeerId, source: FrameError },

    /// An outgoing frame was rejected before it reached the transport
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// A partition operation was rejected
    #[error(transparent)]
    Partition(#[from] PartitionError),

    /// `ServerConfig::directory` is not set
    #[error("No directory is configured")]
    NoDirectory,

    /// The server is not (or no longer) listed on the directory
    #[error("The server is not registered on the directory")]
    NotRegistered,
}

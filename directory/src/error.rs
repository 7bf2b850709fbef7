use std::io;

use thiserror::Error;

/// Errors that can occur while talking to the directory. They end the
/// operation that hit them and are logged, never returned to callers.
#[derive(Debug, Error)]
pub(crate) enum DirectoryError {
    /// The TCP connection could not be established
    #[error("Could not connect to directory at {address}: {source}")]
    Connect { address: String, source: io::Error },

    /// The directory did not respond in time
    #[error("Directory timed out during {phase}")]
    Timeout { phase: &'static str },

    /// Reading from or writing to the connection failed
    #[error("Directory connection failed: {0}")]
    Io(#[from] io::Error),

    /// A line could not be encoded or decoded
    #[error("Malformed directory message: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The directory closed the connection before answering
    #[error("Directory closed the connection before responding")]
    Closed,

    /// The directory answered without a host list
    #[error("Directory rejected the query")]
    Rejected,
}

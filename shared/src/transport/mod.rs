pub mod error;

use crate::{messages::frame::Frame, types::PeerId};

pub use error::{RecvError, SendError};

/// Where an outgoing frame should go
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recipient {
    /// One connected peer (server side)
    Peer(PeerId),
    /// Every connected peer (server side)
    All,
    /// The server (client side)
    Server,
}

/// Something the connection layer observed since the last poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    FrameReceived { from: PeerId, frame: Frame },
    /// On a server, a client finished connecting. On a client, the server
    /// accepted this client, reported as [`PeerId::SERVER`].
    PeerAccepted(PeerId),
    PeerTimedOut(PeerId),
    /// The local end of the connection is gone
    Disconnected,
}

/// The reliable connection a session runs over. Socket handling, handshakes
/// and delivery guarantees live behind this trait.
pub trait Transport {
    fn send(&mut self, recipient: Recipient, frame: &Frame) -> Result<(), SendError>;

    /// Returns the next pending event, or `None` once drained for this pump
    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError>;

    fn disconnect(&mut self);

    fn is_connected(&self) -> bool;
}

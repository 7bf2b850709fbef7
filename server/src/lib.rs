//! # Vista Server
//! The authoritative side of the vista session layer. Drives partition
//! loads for every connected peer, assigns network objects to the behaviors
//! each partition contains, and lists itself on the directory service.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use vista_shared::{
        AttachCode, BehaviorRegistry, Frame, ListenerKey, LoadNotifier, MessageGroupId,
        ObjectCreate, PartitionError, PartitionId, PartitionListener, PartitionMode,
        PartitionState, PeerId, Recipient, RecvError, SendError, Transport, TransportEvent,
        APPLICATION_GROUP_START,
    };
}
pub use vista_directory::{DirectoryConfig, GameSettings, TransportKind};

mod error;
mod events;
mod peer;
mod server;

pub use error::VistaServerError;
pub use events::{
    ConnectEvent, DisconnectEvent, ErrorEvent, Event, Events, FrameEvent, PartitionAckEvent,
};
pub use server::{Server, ServerConfig};

//! # Vista Client
//! The following side of the vista session layer. Loads the partitions the
//! server announces, matches local scene behaviors with the server's network
//! objects, and browses the directory service for servers.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

pub mod shared {
    pub use vista_shared::{
        AttachCode, BehaviorRegistry, Frame, ListenerKey, LoadNotifier, MessageGroupId,
        ObjectCreate, PartitionError, PartitionId, PartitionListener, PartitionState, PeerId,
        Recipient, RecvError, SendError, Transport, TransportEvent, APPLICATION_GROUP_START,
    };
}
pub use vista_directory::{DirectoryConfig, DirectoryRecord, GameSettings};

mod client;
mod error;
mod events;

pub use client::{discover_servers, Client, ClientConfig};
pub use error::VistaClientError;
pub use events::{ConnectEvent, DisconnectEvent, ErrorEvent, Event, Events, FrameEvent};

//! # Vista Shared
//! Session-layer functionality shared between vista-server & vista-client:
//! attach codes, the pending creation table, the partition lifecycle and the
//! control messages peers exchange about it.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use naia_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

mod attach_code;
mod error;
mod listener;
mod messages;
mod partition;
mod pending;
mod registry;
mod session;
mod transport;
mod types;

pub use attach_code::{
    allocator::AttachCodeAllocator, attach_code::AttachCode, error::AttachCodeError,
};
pub use error::ConfigError;
pub use listener::{ListenerKey, ListenerList, PartitionListener};
pub use messages::{
    constants::{
        is_reserved_group, MessageGroupId, APPLICATION_GROUP_START, OBJECT_CREATE,
        OBJECT_CREATE_REQUEST, PARTITION_ACK, PARTITION_CHANGE, PARTITION_INIT, PARTITION_RESET,
    },
    error::FrameError,
    frame::Frame,
    object_messages::{ObjectCreate, ObjectCreateRequest},
    outgoing::Outgoing,
    partition_messages::{PartitionAck, PartitionChange, PartitionInit, PartitionReset},
    session_message::SessionMessage,
};
pub use partition::{
    coordinator::PartitionCoordinator,
    error::PartitionError,
    notice::PartitionNotice,
    partition_set::PartitionSet,
    partition_state::{ChangeMode, LoadMode, PartitionMode, PartitionState},
};
pub use pending::pending_creation_table::{
    BehaviorRegistration, ObjectResolution, PendingCreationTable,
};
pub use registry::BehaviorRegistry;
pub use session::{LoadNotifier, SessionCore};
pub use transport::{Recipient, RecvError, SendError, Transport, TransportEvent};
pub use types::{HostType, NetworkId, PartitionId, PeerId};

use std::{mem, vec::IntoIter};

use vista_shared::{Frame, PartitionId, PartitionMode, PeerId};

use crate::VistaServerError;

pub struct Events {
    connections: Vec<PeerId>,
    disconnections: Vec<PeerId>,
    acks: Vec<(PeerId, PartitionId, PartitionMode)>,
    frames: Vec<(PeerId, Frame)>,
    errors: Vec<VistaServerError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connections: Vec::new(),
            disconnections: Vec::new(),
            acks: Vec::new(),
            frames: Vec::new(),
            errors: Vec::new(),

            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn read<V: Event>(&mut self) -> V::Iter {
        V::iter(self)
    }

    pub fn has<V: Event>(&self) -> bool {
        V::has(self)
    }

    // Crate-public

    pub(crate) fn push_connection(&mut self, peer: PeerId) {
        self.connections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self, peer: PeerId) {
        self.disconnections.push(peer);
        self.empty = false;
    }

    pub(crate) fn push_ack(&mut self, peer: PeerId, id: PartitionId, mode: PartitionMode) {
        self.acks.push((peer, id, mode));
        self.empty = false;
    }

    pub(crate) fn push_frame(&mut self, peer: PeerId, frame: Frame) {
        self.frames.push((peer, frame));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: VistaServerError) {
        self.errors.push(error);
        self.empty = false;
    }
}

// Event Trait
pub trait Event {
    type Iter;

    fn iter(events: &mut Events) -> Self::Iter;

    fn has(events: &Events) -> bool;
}

// ConnectEvent
pub struct ConnectEvent;
impl Event for ConnectEvent {
    type Iter = IntoIter<PeerId>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.connections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.connections.is_empty()
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl Event for DisconnectEvent {
    type Iter = IntoIter<PeerId>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.disconnections);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.disconnections.is_empty()
    }
}

// PartitionAckEvent
pub struct PartitionAckEvent;
impl Event for PartitionAckEvent {
    type Iter = IntoIter<(PeerId, PartitionId, PartitionMode)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.acks);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.acks.is_empty()
    }
}

// FrameEvent, frames in application message groups
pub struct FrameEvent;
impl Event for FrameEvent {
    type Iter = IntoIter<(PeerId, Frame)>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.frames);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.frames.is_empty()
    }
}

// ErrorEvent
pub struct ErrorEvent;
impl Event for ErrorEvent {
    type Iter = IntoIter<VistaServerError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}

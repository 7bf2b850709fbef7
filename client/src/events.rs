use std::{mem, vec::IntoIter};

use vista_shared::Frame;

use crate::VistaClientError;

pub struct Events {
    connected: bool,
    disconnected: bool,
    frames: Vec<Frame>,
    errors: Vec<VistaClientError>,

    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            connected: false,
            disconnected: false,
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

    pub(crate) fn push_connection(&mut self) {
        self.connected = true;
        self.empty = false;
    }

    pub(crate) fn push_disconnection(&mut self) {
        self.disconnected = true;
        self.empty = false;
    }

    pub(crate) fn push_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: VistaClientError) {
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

// ConnectEvent, the server accepted this client
pub struct ConnectEvent;
impl Event for ConnectEvent {
    type Iter = IntoIter<()>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = if mem::take(&mut events.connected) {
            vec![()]
        } else {
            Vec::new()
        };
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        events.connected
    }
}

// DisconnectEvent
pub struct DisconnectEvent;
impl Event for DisconnectEvent {
    type Iter = IntoIter<()>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = if mem::take(&mut events.disconnected) {
            vec![()]
        } else {
            Vec::new()
        };
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        events.disconnected
    }
}

// FrameEvent, frames in application message groups
pub struct FrameEvent;
impl Event for FrameEvent {
    type Iter = IntoIter<Frame>;

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
    type Iter = IntoIter<VistaClientError>;

    fn iter(events: &mut Events) -> Self::Iter {
        let list = mem::take(&mut events.errors);
        IntoIterator::into_iter(list)
    }

    fn has(events: &Events) -> bool {
        !events.errors.is_empty()
    }
}

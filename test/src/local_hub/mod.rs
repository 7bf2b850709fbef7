/// In-memory transport for E2E testing
/// Routes frames between one server and any number of clients without network I/O

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::debug;
use vista_shared::{Frame, PeerId, Recipient, RecvError, SendError, Transport, TransportEvent};

#[derive(Default)]
struct HubState {
    server_open: bool,
    server_inbox: VecDeque<TransportEvent>,
    client_inboxes: HashMap<PeerId, VecDeque<TransportEvent>>,
    next_peer: u64,
}

/// Connects server and client transports through FIFO queues. Frames are
/// delivered in the order they were sent.
#[derive(Clone)]
pub struct LocalHub {
    state: Arc<Mutex<HubState>>,
}

impl LocalHub {
    pub fn new() -> Self {
        let state = HubState {
            server_open: true,
            next_peer: 1,
            ..HubState::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn server_transport(&self) -> Box<dyn Transport> {
        Box::new(LocalServerTransport { hub: self.clone() })
    }

    /// Connects a new client. Both ends see the connection on their next
    /// receive.
    pub fn connect_client(&self) -> (PeerId, Box<dyn Transport>) {
        let mut state = self.lock();
        let peer = PeerId::new(state.next_peer);
        state.next_peer += 1;
        debug!("local hub: {} connected", peer);

        let mut inbox = VecDeque::new();
        inbox.push_back(TransportEvent::PeerAccepted(PeerId::SERVER));
        state.client_inboxes.insert(peer, inbox);
        state
            .server_inbox
            .push_back(TransportEvent::PeerAccepted(peer));

        (
            peer,
            Box::new(LocalClientTransport {
                hub: self.clone(),
                peer,
            }),
        )
    }

    /// Drops `peer` as if its connection had gone silent
    pub fn time_out(&self, peer: PeerId) {
        debug!("local hub: {} timed out", peer);
        let mut state = self.lock();
        state.client_inboxes.remove(&peer);
        state
            .server_inbox
            .push_back(TransportEvent::PeerTimedOut(peer));
    }

    pub fn connected_clients(&self) -> usize {
        self.lock().client_inboxes.len()
    }

    /// Events waiting to be received by `peer`
    pub fn pending_for(&self, peer: PeerId) -> usize {
        self.lock()
            .client_inboxes
            .get(&peer)
            .map_or(0, VecDeque::len)
    }

    fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new()
    }
}

// Server end

struct LocalServerTransport {
    hub: LocalHub,
}

impl Transport for LocalServerTransport {
    fn send(&mut self, recipient: Recipient, frame: &Frame) -> Result<(), SendError> {
        let mut state = self.hub.lock();
        if !state.server_open {
            return Err(SendError);
        }
        let delivered = || TransportEvent::FrameReceived {
            from: PeerId::SERVER,
            frame: frame.clone(),
        };
        match recipient {
            Recipient::Peer(peer) => {
                let inbox = state.client_inboxes.get_mut(&peer).ok_or(SendError)?;
                inbox.push_back(delivered());
            }
            Recipient::All => {
                for inbox in state.client_inboxes.values_mut() {
                    inbox.push_back(delivered());
                }
            }
            Recipient::Server => return Err(SendError),
        }
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError> {
        Ok(self.hub.lock().server_inbox.pop_front())
    }

    fn disconnect(&mut self) {
        let mut state = self.hub.lock();
        state.server_open = false;
        state.server_inbox.clear();
        for inbox in state.client_inboxes.values_mut() {
            inbox.push_back(TransportEvent::Disconnected);
        }
    }

    fn is_connected(&self) -> bool {
        self.hub.lock().server_open
    }
}

// Client end

struct LocalClientTransport {
    hub: LocalHub,
    peer: PeerId,
}

impl Transport for LocalClientTransport {
    fn send(&mut self, recipient: Recipient, frame: &Frame) -> Result<(), SendError> {
        let mut state = self.hub.lock();
        if recipient != Recipient::Server
            || !state.server_open
            || !state.client_inboxes.contains_key(&self.peer)
        {
            return Err(SendError);
        }
        state.server_inbox.push_back(TransportEvent::FrameReceived {
            from: self.peer,
            frame: frame.clone(),
        });
        Ok(())
    }

    fn receive(&mut self) -> Result<Option<TransportEvent>, RecvError> {
        let mut state = self.hub.lock();
        Ok(state
            .client_inboxes
            .get_mut(&self.peer)
            .and_then(VecDeque::pop_front))
    }

    fn disconnect(&mut self) {
        let mut state = self.hub.lock();
        if state.client_inboxes.remove(&self.peer).is_some() {
            state
                .server_inbox
                .push_back(TransportEvent::PeerTimedOut(self.peer));
        }
    }

    fn is_connected(&self) -> bool {
        let state = self.hub.lock();
        state.server_open && state.client_inboxes.contains_key(&self.peer)
    }
}

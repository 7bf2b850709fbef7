use std::{collections::HashMap, mem};

use log::{info, warn};
use tokio::runtime::Handle;

use vista_directory::{
    DirectoryClient, DirectoryRegistration, ListingUpdate, RegistrationState, ServerDescriptor,
};
use vista_shared::{
    is_reserved_group, AttachCode, BehaviorRegistry, Frame, FrameError, HostType, ListenerKey,
    ListenerList, LoadNotifier, Outgoing, PartitionAck, PartitionId, PartitionListener,
    PartitionState, PeerId, Recipient, SessionCore, SessionMessage, Transport, TransportEvent,
    APPLICATION_GROUP_START,
};

use crate::{events::Events, peer::PeerRecord, ServerConfig, VistaServerError};

/// The authoritative end of a session. Decides which partitions are loaded,
/// assigns every network object and brings newly connected peers up to date.
///
/// Call [`Server::receive`] and [`Server::send_all_packets`] once per tick.
pub struct Server<R: BehaviorRegistry> {
    config: ServerConfig,
    session: SessionCore<R>,
    transport: Box<dyn Transport>,
    listeners: ListenerList,
    peers: HashMap<PeerId, PeerRecord>,
    // application frames waiting for the next flush
    outgoing_frames: Vec<(Recipient, Frame)>,
    directory: Option<DirectoryClient>,
    registration: Option<DirectoryRegistration>,
    incoming_events: Events,
}

impl<R: BehaviorRegistry> Server<R> {
    /// Create a new Server
    pub fn new(
        config: ServerConfig,
        registry: R,
        transport: Box<dyn Transport>,
    ) -> Result<Self, VistaServerError> {
        config.validate()?;

        Ok(Self {
            config,
            session: SessionCore::new(HostType::Server, registry),
            transport,
            listeners: ListenerList::new(),
            peers: HashMap::new(),
            outgoing_frames: Vec::new(),
            directory: None,
            registration: None,
            incoming_events: Events::new(),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Must be called regularly, handles everything the transport received
    /// since the last call
    pub fn receive(&mut self) -> Events {
        self.maintain_transport();
        self.maintain_directory();
        self.dispatch_notices();

        // return all received events and reset the buffer
        mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Sends every queued session and application frame
    pub fn send_all_packets(&mut self) {
        self.flush_session();

        for (recipient, frame) in mem::take(&mut self.outgoing_frames) {
            self.send(recipient, &frame);
        }
    }

    /// Queues an application frame. Message groups below
    /// `APPLICATION_GROUP_START` belong to the session and are rejected.
    pub fn send_frame(&mut self, recipient: Recipient, frame: Frame) -> Result<(), VistaServerError> {
        if is_reserved_group(frame.group()) {
            return Err(FrameError::ReservedGroup {
                group: frame.group(),
                start: APPLICATION_GROUP_START,
            }
            .into());
        }
        self.outgoing_frames.push((recipient, frame));
        Ok(())
    }

    // Partitions

    /// Replaces every loaded partition with `id`. Peers are told once the
    /// load completes locally.
    pub fn reset_partition(&mut self, id: PartitionId) {
        self.session.lock().reset(id);
        self.dispatch_notices();
    }

    pub fn add_partition(&mut self, id: PartitionId) -> Result<(), VistaServerError> {
        self.session.lock().add(id)?;
        self.dispatch_notices();
        Ok(())
    }

    pub fn remove_partition(&mut self, id: PartitionId) -> Result<(), VistaServerError> {
        self.session.lock().remove(id)?;
        self.dispatch_notices();
        Ok(())
    }

    pub fn notify_partition_load_complete(&mut self, id: PartitionId) -> Result<(), VistaServerError> {
        self.session.lock().complete_load(id)?;
        Ok(())
    }

    pub fn notify_partition_unload_complete(
        &mut self,
        id: PartitionId,
    ) -> Result<(), VistaServerError> {
        self.session.lock().complete_unload(id)?;
        Ok(())
    }

    /// A handle for reporting finished loads from outside the tick loop
    pub fn load_notifier(&self) -> LoadNotifier<R> {
        self.session.load_notifier()
    }

    /// Creates a runtime object in `partition` and announces it to every peer
    pub fn request_create(
        &mut self,
        partition: PartitionId,
        create_code: AttachCode,
    ) -> Result<(), VistaServerError> {
        self.session.lock().request_create(partition, create_code)?;
        Ok(())
    }

    pub fn partition_state(&self, id: PartitionId) -> Option<PartitionState> {
        self.session.lock().partition_state(id)
    }

    /// Loaded partitions, in the order they finished loading
    pub fn loaded_partitions(&self) -> Vec<PartitionId> {
        self.session.lock().partitions().loaded().to_vec()
    }

    pub fn creates_suppressed(&self) -> bool {
        self.session.lock().creates_suppressed()
    }

    /// Runs `f` with the registry while the session is locked
    pub fn with_registry<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        f(self.session.lock().registry_mut())
    }

    // Listeners

    pub fn add_listener<L: PartitionListener + 'static>(&mut self, listener: L) -> ListenerKey {
        self.listeners.add(listener)
    }

    pub fn remove_listener(&mut self, key: &ListenerKey) -> bool {
        self.listeners.remove(key)
    }

    // Peers

    /// Connected peers, sorted
    pub fn peer_keys(&self) -> Vec<PeerId> {
        let mut keys: Vec<PeerId> = self.peers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn peers_count(&self) -> usize {
        self.peers.len()
    }

    /// Partitions `peer` has acknowledged as loaded, or `None` if the peer
    /// is not connected
    pub fn peer_partitions(&self, peer: &PeerId) -> Option<Vec<PartitionId>> {
        self.peers.get(peer).map(PeerRecord::partitions)
    }

    // Directory

    /// Lists the server on the configured directory. The connection runs on
    /// `runtime` and is held open until the server disconnects.
    pub fn register_on_directory(&mut self, runtime: Handle) -> Result<(), VistaServerError> {
        let Some(directory_config) = self.config.directory.clone() else {
            return Err(VistaServerError::NoDirectory);
        };
        let client = DirectoryClient::new(directory_config, runtime)?;

        let descriptor = ServerDescriptor::new(
            &self.config.game,
            self.config.port,
            self.player_count(),
            self.config.max_players,
            self.config.protocol,
        );
        if let Some(mut previous) = self.registration.replace(client.register(descriptor)) {
            previous.close();
        }
        self.directory = Some(client);
        Ok(())
    }

    /// The directory this server is listed on, if any
    pub fn directory(&self) -> Option<&DirectoryClient> {
        self.directory.as_ref()
    }

    pub fn is_registered(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(DirectoryRegistration::is_active)
    }

    /// Updates the directory listing on a separate, fire-and-forget
    /// connection. Fields passed as `None` keep their current value, the
    /// player count and port are always refreshed.
    pub fn update_listing(
        &mut self,
        comment: Option<String>,
        game_type: Option<String>,
        mode: Option<String>,
    ) -> Result<(), VistaServerError> {
        if !self.is_registered() {
            return Err(VistaServerError::NotRegistered);
        }
        if let Some(comment) = &comment {
            self.config.game.comment = comment.clone();
        }
        if let Some(game_type) = &game_type {
            self.config.game.game_type = game_type.clone();
        }
        if let Some(mode) = &mode {
            self.config.game.game_mode = mode.clone();
        }

        let patch = ListingUpdate {
            player_count: Some(self.player_count()),
            comment,
            game_type,
            mode,
            port: Some(self.config.port),
        };
        if let Some(directory) = &self.directory {
            // the task reports its own failure
            let _ = directory.update(patch);
        }
        Ok(())
    }

    // Teardown

    /// Disconnects every peer and drops all session state before returning.
    /// Listeners are removed and will not be invoked again.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
        self.teardown();
    }

    // Private methods

    fn teardown(&mut self) {
        self.session.lock().clear();
        self.listeners.clear();
        self.peers.clear();
        self.outgoing_frames.clear();
        if let Some(mut registration) = self.registration.take() {
            registration.close();
        }
        self.directory = None;
    }

    fn maintain_transport(&mut self) {
        loop {
            match self.transport.receive() {
                Ok(Some(event)) => self.handle_transport_event(event),
                Ok(None) => break,
                Err(_) => {
                    self.incoming_events.push_error(VistaServerError::RecvError);
                    break;
                }
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::FrameReceived { from, frame } => self.receive_frame(from, frame),
            TransportEvent::PeerAccepted(peer) => {
                info!("peer {} connected", peer);
                // anything queued before the peer joined is covered by its
                // bootstrap
                self.flush_session();
                self.peers.insert(peer, PeerRecord::new());
                self.session.lock().bootstrap_peer(peer);
                self.incoming_events.push_connection(peer);
            }
            TransportEvent::PeerTimedOut(peer) => {
                info!("peer {} timed out", peer);
                if self.peers.remove(&peer).is_some() {
                    self.incoming_events.push_disconnection(peer);
                }
            }
            TransportEvent::Disconnected => {
                info!("server transport closed");
                for peer in self.peer_keys() {
                    self.incoming_events.push_disconnection(peer);
                }
                self.teardown();
            }
        }
    }

    fn receive_frame(&mut self, from: PeerId, frame: Frame) {
        if !frame.is_session_frame() {
            self.incoming_events.push_frame(from, frame);
            return;
        }

        match SessionMessage::from_frame(&frame) {
            Ok(SessionMessage::PartitionAck(ack)) => self.receive_ack(from, ack),
            Ok(message) => self.session.lock().receive_message(from, message),
            Err(error) => {
                warn!("discarding frame from peer {}: {}", from, error);
                self.incoming_events.push_error(VistaServerError::Decode {
                    peer: from,
                    source: error,
                });
            }
        }
    }

    fn receive_ack(&mut self, from: PeerId, ack: PartitionAck) {
        let Some(peer) = self.peers.get_mut(&from) else {
            warn!("discarding acknowledgement from unknown peer {}", from);
            return;
        };
        peer.record_ack(ack.id, ack.mode);
        self.incoming_events.push_ack(from, ack.id, ack.mode);
    }

    fn maintain_directory(&mut self) {
        let lost = self
            .registration
            .as_ref()
            .is_some_and(|registration| registration.state() == RegistrationState::Lost);
        if lost {
            info!("directory listing lost, not reconnecting");
            self.registration = None;
            self.directory = None;
        }
    }

    // listeners run outside the session lock, they may report load
    // completion right away
    fn dispatch_notices(&mut self) {
        let notices = self.session.lock().take_notices();
        for notice in notices {
            self.listeners.dispatch(&notice);
        }
    }

    fn flush_session(&mut self) {
        let outgoing = self.session.lock().take_outgoing();
        for Outgoing { recipient, message } in outgoing {
            self.send(recipient, &message.to_frame());
        }
    }

    // broadcasts only reach peers this server has accepted, anyone else
    // catches up through its bootstrap
    fn send(&mut self, recipient: Recipient, frame: &Frame) {
        let peers = match recipient {
            Recipient::All => self.peer_keys(),
            Recipient::Peer(peer) => vec![peer],
            Recipient::Server => {
                warn!("a server cannot send to itself, dropping frame");
                return;
            }
        };

        for peer in peers {
            let recipient = Recipient::Peer(peer);
            if self.transport.send(recipient, frame).is_err() {
                warn!("could not send frame to peer {}", peer);
                self.incoming_events
                    .push_error(VistaServerError::SendError(recipient));
            }
        }
    }

    fn player_count(&self) -> u32 {
        u32::try_from(self.peers.len()).unwrap_or(u32::MAX)
    }
}

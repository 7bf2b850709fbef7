use std::mem;

use log::{info, warn};
use tokio::{runtime::Handle, task::JoinHandle};

use vista_directory::{DirectoryClient, DirectoryQuery, DirectoryRecord};
use vista_shared::{
    is_reserved_group, AttachCode, BehaviorRegistry, Frame, FrameError, HostType, ListenerKey,
    ListenerList, LoadNotifier, Outgoing, PartitionId, PartitionListener, PartitionState, PeerId,
    Recipient, SessionCore, SessionMessage, Transport, TransportEvent, APPLICATION_GROUP_START,
};

use crate::{events::Events, ClientConfig, VistaClientError};

/// The following end of a session. Loads whatever partitions the server
/// announces and pairs the behaviors they contain with the server's objects.
///
/// Call [`Client::receive`] and [`Client::send_all_packets`] once per tick.
pub struct Client<R: BehaviorRegistry> {
    config: ClientConfig,
    session: SessionCore<R>,
    transport: Box<dyn Transport>,
    listeners: ListenerList,
    // application frames waiting for the next flush
    outgoing_frames: Vec<Frame>,
    incoming_events: Events,
}

impl<R: BehaviorRegistry> Client<R> {
    /// Create a new Client
    pub fn new(
        config: ClientConfig,
        registry: R,
        transport: Box<dyn Transport>,
    ) -> Result<Self, VistaClientError> {
        config.validate()?;

        Ok(Self {
            config,
            session: SessionCore::new(HostType::Client, registry),
            transport,
            listeners: ListenerList::new(),
            outgoing_frames: Vec::new(),
            incoming_events: Events::new(),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    /// Must be called regularly, handles everything the transport received
    /// since the last call
    pub fn receive(&mut self) -> Events {
        loop {
            match self.transport.receive() {
                Ok(Some(event)) => self.handle_transport_event(event),
                Ok(None) => break,
                Err(_) => {
                    self.incoming_events.push_error(VistaClientError::RecvError);
                    break;
                }
            }
        }
        self.dispatch_notices();

        // return all received events and reset the buffer
        mem::replace(&mut self.incoming_events, Events::new())
    }

    /// Sends acknowledgements, creation requests and queued application
    /// frames to the server
    pub fn send_all_packets(&mut self) {
        let outgoing = self.session.lock().take_outgoing();
        for Outgoing { message, .. } in outgoing {
            self.send(&message.to_frame());
        }

        for frame in mem::take(&mut self.outgoing_frames) {
            self.send(&frame);
        }
    }

    /// Queues an application frame for the server. Message groups below
    /// `APPLICATION_GROUP_START` belong to the session and are rejected.
    pub fn send_frame(&mut self, frame: Frame) -> Result<(), VistaClientError> {
        if is_reserved_group(frame.group()) {
            return Err(FrameError::ReservedGroup {
                group: frame.group(),
                start: APPLICATION_GROUP_START,
            }
            .into());
        }
        self.outgoing_frames.push(frame);
        Ok(())
    }

    // Partitions

    /// Reports that the load the server asked for has finished. Scene
    /// behaviors are matched against the server's objects and the server is
    /// told the partition is loaded.
    pub fn notify_partition_load_complete(&mut self, id: PartitionId) -> Result<(), VistaClientError> {
        self.session.lock().complete_load(id)?;
        Ok(())
    }

    pub fn notify_partition_unload_complete(
        &mut self,
        id: PartitionId,
    ) -> Result<(), VistaClientError> {
        self.session.lock().complete_unload(id)?;
        Ok(())
    }

    /// A handle for reporting finished loads from outside the tick loop
    pub fn load_notifier(&self) -> LoadNotifier<R> {
        self.session.load_notifier()
    }

    /// Asks the server to create a runtime object in `partition`
    pub fn request_create(
        &mut self,
        partition: PartitionId,
        create_code: AttachCode,
    ) -> Result<(), VistaClientError> {
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

    /// Behaviors still waiting for their network object
    pub fn pending_behavior_count(&self) -> usize {
        self.session.lock().pending().pending_behavior_count()
    }

    /// Network objects still waiting for their behavior
    pub fn pending_object_count(&self) -> usize {
        self.session.lock().pending().pending_object_count()
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

    // Directory

    /// Queries the configured directory in the background, see
    /// [`discover_servers`]
    pub fn discover_servers<F>(
        &self,
        runtime: Handle,
        callback: F,
    ) -> Result<JoinHandle<()>, VistaClientError>
    where
        F: FnOnce(Option<Vec<DirectoryRecord>>) + Send + 'static,
    {
        discover_servers(&self.config, runtime, callback)
    }

    // Teardown

    /// Leaves the session and drops all of its state before returning.
    /// Listeners are removed and will not be invoked again.
    pub fn disconnect(&mut self) {
        self.transport.disconnect();
        self.teardown();
    }

    // Private methods

    fn teardown(&mut self) {
        self.session.lock().clear();
        self.listeners.clear();
        self.outgoing_frames.clear();
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::FrameReceived { from, frame } => self.receive_frame(from, frame),
            TransportEvent::PeerAccepted(_) => {
                info!("connected to server");
                self.incoming_events.push_connection();
            }
            TransportEvent::PeerTimedOut(peer) if peer == PeerId::SERVER => {
                info!("server timed out");
                self.incoming_events.push_disconnection();
                self.teardown();
            }
            TransportEvent::PeerTimedOut(peer) => {
                warn!("ignoring timeout of unknown peer {}", peer);
            }
            TransportEvent::Disconnected => {
                info!("disconnected from server");
                self.incoming_events.push_disconnection();
                self.teardown();
            }
        }
    }

    fn receive_frame(&mut self, from: PeerId, frame: Frame) {
        if !frame.is_session_frame() {
            self.incoming_events.push_frame(frame);
            return;
        }

        match SessionMessage::from_frame(&frame) {
            Ok(message) => self.session.lock().receive_message(from, message),
            Err(error) => {
                warn!("discarding frame from server: {}", error);
                self.incoming_events
                    .push_error(VistaClientError::Decode(error));
            }
        }
    }

    // listeners run outside the session lock, they may report load
    // completion right away. A finished unload can start a held add, whose
    // notice goes out in the same call.
    fn dispatch_notices(&mut self) {
        loop {
            let notices = self.session.lock().take_notices();
            if notices.is_empty() {
                break;
            }
            for notice in notices {
                self.listeners.dispatch(&notice);
            }
        }

        let rejections = self.session.lock().take_rejections();
        for error in rejections {
            self.incoming_events.push_error(error.into());
        }
    }

    fn send(&mut self, frame: &Frame) {
        if self.transport.send(Recipient::Server, frame).is_err() {
            warn!("could not send frame to the server");
            self.incoming_events.push_error(VistaClientError::SendError);
        }
    }
}

/// Asks the directory configured in `config` for servers running the same
/// game. `callback` runs on a `runtime` thread with the matching servers,
/// an empty list when none match, or `None` when the directory could not
/// be queried.
pub fn discover_servers<F>(
    config: &ClientConfig,
    runtime: Handle,
    callback: F,
) -> Result<JoinHandle<()>, VistaClientError>
where
    F: FnOnce(Option<Vec<DirectoryRecord>>) + Send + 'static,
{
    let Some(directory_config) = config.directory.clone() else {
        return Err(VistaClientError::NoDirectory);
    };
    let directory = DirectoryClient::new(directory_config, runtime)?;
    Ok(directory.spawn_query(DirectoryQuery::from_settings(&config.game), callback))
}

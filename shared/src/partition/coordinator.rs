use std::collections::{HashMap, HashSet};

use log::{debug, info, warn};

use crate::{
    attach_code::{allocator::AttachCodeAllocator, attach_code::AttachCode},
    messages::{
        object_messages::{ObjectCreate, ObjectCreateRequest},
        outgoing::Outgoing,
        partition_messages::{PartitionAck, PartitionChange, PartitionInit, PartitionReset},
        session_message::SessionMessage,
    },
    partition::{
        error::PartitionError,
        notice::PartitionNotice,
        partition_set::PartitionSet,
        partition_state::{ChangeMode, LoadMode, PartitionMode, PartitionState},
    },
    pending::pending_creation_table::{
        BehaviorRegistration, ObjectResolution, PendingCreationTable,
    },
    registry::BehaviorRegistry,
    transport::Recipient,
    types::{HostType, NetworkId, PartitionId, PeerId},
};

/// Drives partition load, add and remove for one session, and pairs the
/// behaviors each partition contains with their network objects.
///
/// Nothing here touches a socket. Messages for peers are queued and picked
/// up with [`PartitionCoordinator::take_outgoing`], requests for the embedding
/// application with [`PartitionCoordinator::take_notices`].
///
/// A server announces a Reset or Add to its peers when its own load
/// completes, immediately followed by the objects of that partition, so a
/// client always holds every object before it finishes the same load.
pub struct PartitionCoordinator<R: BehaviorRegistry> {
    host_type: HostType,
    registry: R,
    partitions: PartitionSet,
    allocator: AttachCodeAllocator,
    pending: PendingCreationTable<R::Behavior, R::Object>,
    // inbound creations held back while their partition (or a reset) loads
    suppressed_creates: Vec<ObjectCreate>,
    // creation requests held back the same way
    queued_requests: Vec<ObjectCreateRequest>,
    known_objects: HashMap<NetworkId, ObjectCreate>,
    // partitions whose unmatched behaviors are destroyed once nothing loads
    deferred_drains: HashSet<PartitionId>,
    // adds received while the same id was still unloading
    held_adds: HashSet<PartitionId>,
    // server-driven transitions that could not be applied
    rejections: Vec<PartitionError>,
    next_network_id: NetworkId,
    outgoing: Vec<Outgoing>,
    notices: Vec<PartitionNotice>,
}

impl<R: BehaviorRegistry> PartitionCoordinator<R> {
    pub fn new(host_type: HostType, registry: R) -> Self {
        Self {
            host_type,
            registry,
            partitions: PartitionSet::new(),
            allocator: AttachCodeAllocator::new(),
            pending: PendingCreationTable::new(),
            suppressed_creates: Vec::new(),
            queued_requests: Vec::new(),
            known_objects: HashMap::new(),
            deferred_drains: HashSet::new(),
            held_adds: HashSet::new(),
            rejections: Vec::new(),
            next_network_id: 1,
            outgoing: Vec::new(),
            notices: Vec::new(),
        }
    }

    // Accessors

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn partitions(&self) -> &PartitionSet {
        &self.partitions
    }

    pub fn partition_state(&self, id: PartitionId) -> Option<PartitionState> {
        self.partitions.state(id)
    }

    /// True iff at least one partition is loading
    pub fn creates_suppressed(&self) -> bool {
        self.partitions.any_loading()
    }

    pub fn pending(&self) -> &PendingCreationTable<R::Behavior, R::Object> {
        &self.pending
    }

    pub fn object(&self, network_id: NetworkId) -> Option<&ObjectCreate> {
        self.known_objects.get(&network_id)
    }

    pub fn object_count(&self) -> usize {
        self.known_objects.len()
    }

    pub fn suppressed_create_count(&self) -> usize {
        self.suppressed_creates.len()
    }

    pub fn queued_request_count(&self) -> usize {
        self.queued_requests.len()
    }

    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    pub fn take_outgoing(&mut self) -> Vec<Outgoing> {
        std::mem::take(&mut self.outgoing)
    }

    pub fn take_notices(&mut self) -> Vec<PartitionNotice> {
        std::mem::take(&mut self.notices)
    }

    /// Transitions the server asked for that this session had to reject. The
    /// session is out of step with the server until it resets.
    pub fn take_rejections(&mut self) -> Vec<PartitionError> {
        std::mem::take(&mut self.rejections)
    }

    /// Whether an add for `id` waits for its unload to complete
    pub fn add_held(&self, id: PartitionId) -> bool {
        self.held_adds.contains(&id)
    }

    // Transitions

    /// Replaces every partition with `id`, which starts loading
    pub fn reset(&mut self, id: PartitionId) {
        info!("partition {} reset", id);

        self.partitions.begin_reset(id);
        self.pending.clear();
        self.allocator.clear();
        self.suppressed_creates.clear();
        self.queued_requests.clear();
        self.deferred_drains.clear();
        self.held_adds.clear();

        let mut network_ids: Vec<NetworkId> = self.known_objects.keys().copied().collect();
        network_ids.sort_unstable();
        for network_id in network_ids {
            self.registry.destroy_object(network_id);
        }
        self.known_objects.clear();

        self.notices.push(PartitionNotice::Reset(id));
    }

    /// Starts loading `id` next to the partitions already loaded
    pub fn add(&mut self, id: PartitionId) -> Result<(), PartitionError> {
        self.partitions.begin_add(id)?;
        info!("partition {} added", id);

        self.allocator.reset(id);
        self.notices.push(PartitionNotice::Added(id));
        Ok(())
    }

    /// Starts unloading `id`, or cancels it if it is still loading. Objects
    /// and behaviors that belong to it are destroyed right away.
    pub fn remove(&mut self, id: PartitionId) -> Result<(), PartitionError> {
        let previous = self.partitions.begin_remove(id)?;
        info!("partition {} removed", id);

        self.destroy_partition_objects(id);
        for behavior in self.pending.drain_unmatched(id) {
            self.registry.destroy(behavior);
        }
        self.suppressed_creates.retain(|create| create.partition != id);
        self.queued_requests.retain(|request| request.partition != id);
        self.deferred_drains.remove(&id);

        self.notices.push(PartitionNotice::Removed(id));
        if self.host_type == HostType::Server && previous == PartitionState::Loaded {
            self.broadcast(SessionMessage::PartitionChange(PartitionChange {
                id,
                mode: ChangeMode::Remove,
            }));
        }

        if previous == PartitionState::Loading {
            // a cancelled load may have been the last thing suppressing creation
            self.settle();
        }

        Ok(())
    }

    /// The embedding application finished loading `id`. Attach codes are
    /// handed out to the partition's behaviors in discovery order.
    ///
    /// A completion for a partition that is no longer loading, for instance
    /// one superseded by a Reset, is logged and rejected without side effects.
    pub fn complete_load(&mut self, id: PartitionId) -> Result<(), PartitionError> {
        let mode = match self.partitions.complete_load(id) {
            Ok(mode) => mode,
            Err(error) => {
                warn!("ignoring load completion for partition {}: {}", id, error);
                return Err(error);
            }
        };
        info!("partition {} loaded", id);

        self.allocator.reset(id);
        let behaviors = self.registry.find_uninitialized_behaviors(id);

        match self.host_type {
            HostType::Server => {
                let announcement = match mode {
                    LoadMode::Reset => SessionMessage::PartitionReset(PartitionReset { id }),
                    LoadMode::Add => SessionMessage::PartitionChange(PartitionChange {
                        id,
                        mode: ChangeMode::Add,
                    }),
                };
                self.broadcast(announcement);
                self.bind_scene_behaviors(id, behaviors);
            }
            HostType::Client => {
                self.send_to_server(SessionMessage::PartitionAck(PartitionAck {
                    id,
                    mode: mode.into(),
                }));
                self.register_scene_behaviors(id, behaviors);
            }
        }

        self.deferred_drains.insert(id);
        self.settle();

        Ok(())
    }

    /// The embedding application finished unloading `id`, which can be
    /// loaded again from now on. An add the server sent in the meantime
    /// starts right away.
    pub fn complete_unload(&mut self, id: PartitionId) -> Result<(), PartitionError> {
        if let Err(error) = self.partitions.complete_unload(id) {
            warn!("ignoring unload completion for partition {}: {}", id, error);
            return Err(error);
        }
        info!("partition {} unloaded", id);

        self.allocator.reset(id);
        if self.host_type == HostType::Client {
            self.send_to_server(SessionMessage::PartitionAck(PartitionAck {
                id,
                mode: PartitionMode::Remove,
            }));
        }

        if self.held_adds.remove(&id) {
            self.receive_add(id);
        }

        Ok(())
    }

    // Object creation

    /// Asks for a runtime object with a non-negative `create_code`. Held back
    /// while the partition loads, then created by the server and announced
    /// to every peer.
    pub fn request_create(
        &mut self,
        partition: PartitionId,
        create_code: AttachCode,
    ) -> Result<(), PartitionError> {
        if create_code.is_pending() {
            return Err(PartitionError::ReservedAttachCode { code: create_code });
        }
        match self.partitions.state(partition) {
            None => return Err(PartitionError::UnknownPartition { id: partition }),
            Some(PartitionState::Unloading) => {
                return Err(PartitionError::UnexpectedState {
                    id: partition,
                    state: PartitionState::Unloading,
                    expected: PartitionState::Loaded,
                })
            }
            Some(_) => {}
        }

        let request = ObjectCreateRequest {
            create_code,
            partition,
        };
        if self.is_suppressed(partition) {
            self.queued_requests.push(request);
        } else {
            self.perform_request(request);
        }
        Ok(())
    }

    // Incoming

    /// Handles a session message from `from`. Messages that make no sense
    /// for this role or this partition state are logged and discarded.
    pub fn receive_message(&mut self, from: PeerId, message: SessionMessage) {
        match (self.host_type, message) {
            (HostType::Client, SessionMessage::PartitionReset(reset)) => self.reset(reset.id),
            (HostType::Client, SessionMessage::PartitionInit(init)) => match init.mode {
                LoadMode::Reset => self.reset(init.id),
                LoadMode::Add => self.receive_add(init.id),
            },
            (HostType::Client, SessionMessage::PartitionChange(change)) => match change.mode {
                ChangeMode::Add => self.receive_add(change.id),
                ChangeMode::Remove => self.receive_remove(change.id),
            },
            (HostType::Client, SessionMessage::ObjectCreate(create)) => {
                self.receive_object_create(create)
            }
            (HostType::Server, SessionMessage::ObjectCreateRequest(request)) => {
                self.receive_create_request(from, request)
            }
            (host_type, message) => {
                warn!(
                    "{:?} discarding unexpected {:?} from {}",
                    host_type, message, from
                );
            }
        }
    }

    /// Queues what a newly connected peer needs to catch up: every loaded
    /// partition in load order, then every live object
    pub fn bootstrap_peer(&mut self, peer: PeerId) {
        for (id, mode) in self.partitions.bootstrap_order() {
            self.outgoing.push(Outgoing::new(
                Recipient::Peer(peer),
                SessionMessage::PartitionInit(PartitionInit { id, mode }),
            ));
        }

        let mut creates: Vec<ObjectCreate> = self
            .known_objects
            .values()
            .filter(|create| self.partitions.is_loaded(create.partition))
            .copied()
            .collect();
        creates.sort_unstable_by_key(|create| create.network_id);
        for create in creates {
            self.outgoing.push(Outgoing::new(
                Recipient::Peer(peer),
                SessionMessage::ObjectCreate(create),
            ));
        }
    }

    /// Drops all partitions, pending pairs and queued messages. Nothing is
    /// handed back to the registry.
    pub fn clear(&mut self) {
        self.partitions.clear();
        self.allocator.clear();
        self.pending.clear();
        self.suppressed_creates.clear();
        self.queued_requests.clear();
        self.known_objects.clear();
        self.deferred_drains.clear();
        self.held_adds.clear();
        self.rejections.clear();
        self.outgoing.clear();
        self.notices.clear();
    }

    // Private

    fn receive_add(&mut self, id: PartitionId) {
        if self.partitions.state(id) == Some(PartitionState::Unloading) {
            debug!("holding add of partition {} until its unload completes", id);
            self.held_adds.insert(id);
            return;
        }
        if let Err(error) = self.add(id) {
            warn!("rejecting add of partition {}: {}", id, error);
            self.rejections.push(error);
        }
    }

    fn receive_remove(&mut self, id: PartitionId) {
        if self.held_adds.remove(&id) {
            debug!("dropping held add of partition {}", id);
            self.suppressed_creates.retain(|create| create.partition != id);
            return;
        }
        if let Err(error) = self.remove(id) {
            warn!("rejecting remove of partition {}: {}", id, error);
            self.rejections.push(error);
        }
    }

    fn receive_object_create(&mut self, create: ObjectCreate) {
        match self.partitions.state(create.partition) {
            Some(PartitionState::Unloading) if self.held_adds.contains(&create.partition) => {
                debug!(
                    "holding object {} until partition {} is loaded again",
                    create.network_id, create.partition
                );
                self.suppressed_creates.push(create);
                return;
            }
            None | Some(PartitionState::Unloading) => {
                warn!(
                    "discarding object {} for partition {}, which is not loaded",
                    create.network_id, create.partition
                );
                return;
            }
            Some(_) => {}
        }

        if self.is_suppressed(create.partition) {
            debug!(
                "holding object {} until partition {} loads",
                create.network_id, create.partition
            );
            self.suppressed_creates.push(create);
            return;
        }

        self.dispatch_create(create);
    }

    fn receive_create_request(&mut self, from: PeerId, request: ObjectCreateRequest) {
        if request.create_code.is_pending() {
            warn!(
                "discarding request for reserved attach code {} from {}",
                request.create_code, from
            );
            return;
        }
        match self.partitions.state(request.partition) {
            Some(PartitionState::Loaded) => self.create_authoritative(request),
            Some(PartitionState::Loading) => self.queued_requests.push(request),
            _ => warn!(
                "discarding create request from {} for partition {}, which is not loaded",
                from, request.partition
            ),
        }
    }

    fn is_suppressed(&self, partition: PartitionId) -> bool {
        self.partitions.reset_in_progress()
            || self.partitions.is_loading(partition)
            || self.held_adds.contains(&partition)
    }

    fn bind_scene_behaviors(&mut self, id: PartitionId, behaviors: Vec<R::Behavior>) {
        for behavior in behaviors {
            let create_code = match self.allocator.allocate(id) {
                Ok(code) => code,
                Err(error) => {
                    warn!("destroying scene behavior: {}", error);
                    self.registry.destroy(behavior);
                    continue;
                }
            };
            let create = ObjectCreate {
                network_id: self.next_network_id(),
                create_code,
                partition: id,
            };
            let object = self.registry.create_network_object(&create);
            self.registry.bind(behavior, object);
            self.known_objects.insert(create.network_id, create);
            self.broadcast(SessionMessage::ObjectCreate(create));
        }
    }

    fn register_scene_behaviors(&mut self, id: PartitionId, behaviors: Vec<R::Behavior>) {
        for behavior in behaviors {
            let code = match self.allocator.allocate(id) {
                Ok(code) => code,
                Err(error) => {
                    warn!("destroying scene behavior: {}", error);
                    self.registry.destroy(behavior);
                    continue;
                }
            };
            match self.pending.register_pending_behavior(code, behavior) {
                BehaviorRegistration::Matched(behavior, object) => {
                    self.registry.bind(behavior, object)
                }
                BehaviorRegistration::Pending => {}
                BehaviorRegistration::Replaced(displaced) => self.registry.destroy(displaced),
            }
        }
    }

    fn dispatch_create(&mut self, create: ObjectCreate) {
        if self.known_objects.contains_key(&create.network_id) {
            warn!("object {} announced twice, ignoring", create.network_id);
            return;
        }

        let object = self.registry.create_network_object(&create);
        self.known_objects.insert(create.network_id, create);
        match self.pending.resolve_incoming_object(create.create_code, object) {
            ObjectResolution::Matched(behavior, object) => self.registry.bind(behavior, object),
            ObjectResolution::Buffered => debug!(
                "object {} waits for a behavior with attach code {}",
                create.network_id, create.create_code
            ),
            // runtime spawns have nothing to attach to
            ObjectResolution::Unclaimed(_) => {}
        }
    }

    fn perform_request(&mut self, request: ObjectCreateRequest) {
        match self.host_type {
            HostType::Server => self.create_authoritative(request),
            HostType::Client => {
                self.send_to_server(SessionMessage::ObjectCreateRequest(request))
            }
        }
    }

    fn create_authoritative(&mut self, request: ObjectCreateRequest) {
        let create = ObjectCreate {
            network_id: self.next_network_id(),
            create_code: request.create_code,
            partition: request.partition,
        };
        // the registry keeps the object, there is no behavior to bind it to
        let _ = self.registry.create_network_object(&create);
        self.known_objects.insert(create.network_id, create);
        self.broadcast(SessionMessage::ObjectCreate(create));
    }

    /// Releases whatever is no longer held back, and destroys unmatched
    /// behaviors once no partition is loading
    fn settle(&mut self) {
        let held_creates = std::mem::take(&mut self.suppressed_creates);
        for create in held_creates {
            if self.is_suppressed(create.partition) {
                self.suppressed_creates.push(create);
            } else {
                self.dispatch_create(create);
            }
        }

        let held_requests = std::mem::take(&mut self.queued_requests);
        for request in held_requests {
            if self.is_suppressed(request.partition) {
                self.queued_requests.push(request);
            } else {
                self.perform_request(request);
            }
        }

        if self.partitions.any_loading() {
            return;
        }

        let mut drains: Vec<PartitionId> = self.deferred_drains.drain().collect();
        drains.sort_unstable();
        for partition in drains {
            let behaviors = self.pending.drain_unmatched(partition);
            if !behaviors.is_empty() {
                info!(
                    "destroying {} unmatched behavior(s) in partition {}",
                    behaviors.len(),
                    partition
                );
            }
            for behavior in behaviors {
                self.registry.destroy(behavior);
            }
        }
    }

    fn destroy_partition_objects(&mut self, id: PartitionId) {
        let mut network_ids: Vec<NetworkId> = self
            .known_objects
            .values()
            .filter(|create| create.partition == id)
            .map(|create| create.network_id)
            .collect();
        network_ids.sort_unstable();
        for network_id in network_ids {
            self.known_objects.remove(&network_id);
            self.registry.destroy_object(network_id);
        }
    }

    fn next_network_id(&mut self) -> NetworkId {
        let network_id = self.next_network_id;
        self.next_network_id = self.next_network_id.wrapping_add(1);
        network_id
    }

    fn broadcast(&mut self, message: SessionMessage) {
        self.outgoing.push(Outgoing::new(Recipient::All, message));
    }

    fn send_to_server(&mut self, message: SessionMessage) {
        self.outgoing.push(Outgoing::new(Recipient::Server, message));
    }
}

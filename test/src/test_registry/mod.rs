/// Recording behavior registry for E2E testing
/// Stands in for a host engine's scene: behaviors are names placed into
/// partitions, network objects are their NetworkIds

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use vista_shared::{BehaviorRegistry, NetworkId, ObjectCreate, PartitionId};

#[derive(Default)]
struct SceneLog {
    placed: HashMap<PartitionId, Vec<String>>,
    created: Vec<ObjectCreate>,
    bound: Vec<(String, NetworkId)>,
    destroyed: Vec<String>,
    destroyed_objects: Vec<NetworkId>,
}

/// Clones share the same log, so a test can keep one while the session owns
/// the other
#[derive(Clone, Default)]
pub struct TestRegistry {
    log: Arc<Mutex<SceneLog>>,
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Behaviors the next load of `partition` will discover, in order
    pub fn place(&self, partition: PartitionId, names: &[&str]) {
        self.lock()
            .placed
            .insert(partition, names.iter().map(|name| name.to_string()).collect());
    }

    pub fn created(&self) -> Vec<ObjectCreate> {
        self.lock().created.clone()
    }

    pub fn bound(&self) -> Vec<(String, NetworkId)> {
        self.lock().bound.clone()
    }

    /// The NetworkId bound to the behavior called `name`
    pub fn object_of(&self, name: &str) -> Option<NetworkId> {
        self.lock()
            .bound
            .iter()
            .find(|(bound, _)| bound == name)
            .map(|(_, network_id)| *network_id)
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.lock().destroyed.clone()
    }

    pub fn destroyed_objects(&self) -> Vec<NetworkId> {
        self.lock().destroyed_objects.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SceneLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BehaviorRegistry for TestRegistry {
    type Behavior = String;
    type Object = NetworkId;

    fn find_uninitialized_behaviors(&mut self, partition: PartitionId) -> Vec<String> {
        self.lock().placed.remove(&partition).unwrap_or_default()
    }

    fn create_network_object(&mut self, create: &ObjectCreate) -> NetworkId {
        self.lock().created.push(*create);
        create.network_id
    }

    fn bind(&mut self, behavior: String, object: NetworkId) {
        self.lock().bound.push((behavior, object));
    }

    fn destroy(&mut self, behavior: String) {
        self.lock().destroyed.push(behavior);
    }

    fn destroy_object(&mut self, network_id: NetworkId) {
        self.lock().destroyed_objects.push(network_id);
    }
}

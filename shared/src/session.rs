use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    partition::{coordinator::PartitionCoordinator, error::PartitionError},
    registry::BehaviorRegistry,
    types::{HostType, PartitionId},
};

/// The coordinator of one session behind the single lock that guards its
/// partition state and pending table. Cloning shares the same session.
pub struct SessionCore<R: BehaviorRegistry> {
    inner: Arc<Mutex<PartitionCoordinator<R>>>,
}

impl<R: BehaviorRegistry> SessionCore<R> {
    pub fn new(host_type: HostType, registry: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PartitionCoordinator::new(host_type, registry))),
        }
    }

    /// Locks the session. A panic while the lock was held does not make the
    /// session unusable, the coordinator is left as the panic found it.
    pub fn lock(&self) -> MutexGuard<'_, PartitionCoordinator<R>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn load_notifier(&self) -> LoadNotifier<R> {
        LoadNotifier {
            core: self.clone(),
        }
    }
}

impl<R: BehaviorRegistry> Clone for SessionCore<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Lets the embedding application report finished loads and unloads from
/// wherever its loading code runs
pub struct LoadNotifier<R: BehaviorRegistry> {
    core: SessionCore<R>,
}

impl<R: BehaviorRegistry> LoadNotifier<R> {
    pub fn notify_partition_load_complete(&self, id: PartitionId) -> Result<(), PartitionError> {
        self.core.lock().complete_load(id)
    }

    pub fn notify_partition_unload_complete(&self, id: PartitionId) -> Result<(), PartitionError> {
        self.core.lock().complete_unload(id)
    }
}

impl<R: BehaviorRegistry> Clone for LoadNotifier<R> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
        }
    }
}

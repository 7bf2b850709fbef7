use std::sync::{Arc, Mutex, PoisonError};

use vista_shared::{BehaviorRegistry, LoadNotifier, PartitionId, PartitionListener, PartitionNotice};

/// Records every partition notice it receives
#[derive(Clone, Default)]
pub struct TestListener {
    notices: Arc<Mutex<Vec<PartitionNotice>>>,
}

impl TestListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far, oldest first
    pub fn notices(&self) -> Vec<PartitionNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, notice: PartitionNotice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

impl PartitionListener for TestListener {
    fn on_partition_reset(&mut self, id: PartitionId) {
        self.push(PartitionNotice::Reset(id));
    }

    fn on_partition_added(&mut self, id: PartitionId) {
        self.push(PartitionNotice::Added(id));
    }

    fn on_partition_removed(&mut self, id: PartitionId) {
        self.push(PartitionNotice::Removed(id));
    }
}

/// Finishes every load and unload as soon as it is requested, the way an
/// engine with nothing to stream would
pub struct AutoLoader<R: BehaviorRegistry> {
    notifier: LoadNotifier<R>,
}

impl<R: BehaviorRegistry> AutoLoader<R> {
    pub fn new(notifier: LoadNotifier<R>) -> Self {
        Self { notifier }
    }
}

impl<R: BehaviorRegistry> PartitionListener for AutoLoader<R> {
    fn on_partition_reset(&mut self, id: PartitionId) {
        let _ = self.notifier.notify_partition_load_complete(id);
    }

    fn on_partition_added(&mut self, id: PartitionId) {
        let _ = self.notifier.notify_partition_load_complete(id);
    }

    fn on_partition_removed(&mut self, id: PartitionId) {
        let _ = self.notifier.notify_partition_unload_complete(id);
    }
}

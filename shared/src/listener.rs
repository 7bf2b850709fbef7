use crate::{partition::notice::PartitionNotice, types::PartitionId};

/// Lifecycle hooks the embedding application implements to load and unload
/// its own resources. After a load finishes, the application reports back
/// through `notify_partition_load_complete`.
pub trait PartitionListener {
    fn on_partition_reset(&mut self, _id: PartitionId) {}
    fn on_partition_added(&mut self, _id: PartitionId) {}
    fn on_partition_removed(&mut self, _id: PartitionId) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerKey(u32);

/// Observer list owned by a session. Cleared on teardown so nothing is
/// invoked after a disconnect.
pub struct ListenerList {
    next_key: u32,
    listeners: Vec<(ListenerKey, Box<dyn PartitionListener>)>,
}

impl ListenerList {
    pub fn new() -> Self {
        Self {
            next_key: 0,
            listeners: Vec::new(),
        }
    }

    pub fn add<L: PartitionListener + 'static>(&mut self, listener: L) -> ListenerKey {
        let key = ListenerKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        self.listeners.push((key, Box::new(listener)));
        key
    }

    /// Returns whether a listener was registered under `key`
    pub fn remove(&mut self, key: &ListenerKey) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_key, _)| listener_key != key);
        before != self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Invokes every listener, in registration order
    pub fn dispatch(&mut self, notice: &PartitionNotice) {
        for (_, listener) in self.listeners.iter_mut() {
            match notice {
                PartitionNotice::Reset(id) => listener.on_partition_reset(*id),
                PartitionNotice::Added(id) => listener.on_partition_added(*id),
                PartitionNotice::Removed(id) => listener.on_partition_removed(*id),
            }
        }
    }
}

impl Default for ListenerList {
    fn default() -> Self {
        Self::new()
    }
}

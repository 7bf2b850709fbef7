use std::collections::HashMap;

use log::warn;

use crate::{attach_code::attach_code::AttachCode, types::PartitionId};

enum PendingEntry<B, O> {
    Behavior(B),
    Object(O),
}

/// Outcome of registering a local behavior against the table
pub enum BehaviorRegistration<B, O> {
    /// The object already arrived; both entries are gone
    Matched(B, O),
    /// The behavior now waits for its object
    Pending,
    /// A behavior already waited on this code and was displaced by the new one
    Replaced(B),
}

/// Outcome of offering an incoming network object to the table
pub enum ObjectResolution<B, O> {
    /// A pending behavior claimed the object; both entries are gone
    Matched(B, O),
    /// The object arrived first and waits for its behavior
    Buffered,
    /// Nothing claims this object here. Either its code is non-negative and
    /// it was never this peer's to correlate, or it displaced an older
    /// buffered object with the same code, which is returned.
    Unclaimed(O),
}

/// Pairs locally pending behaviors with network objects by attach code,
/// from whichever side shows up first.
///
/// Resolution and removal happen in the same step for a given code, so a code
/// leaves the table at most once.
pub struct PendingCreationTable<B, O> {
    entries: HashMap<AttachCode, PendingEntry<B, O>>,
}

impl<B, O> PendingCreationTable<B, O> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register_pending_behavior(
        &mut self,
        code: AttachCode,
        behavior: B,
    ) -> BehaviorRegistration<B, O> {
        match self.entries.remove(&code) {
            Some(PendingEntry::Object(object)) => BehaviorRegistration::Matched(behavior, object),
            Some(PendingEntry::Behavior(displaced)) => {
                warn!("attach code {} registered twice, keeping the newest behavior", code);
                self.entries.insert(code, PendingEntry::Behavior(behavior));
                BehaviorRegistration::Replaced(displaced)
            }
            None => {
                self.entries.insert(code, PendingEntry::Behavior(behavior));
                BehaviorRegistration::Pending
            }
        }
    }

    pub fn resolve_incoming_object(&mut self, code: AttachCode, object: O) -> ObjectResolution<B, O> {
        match self.entries.remove(&code) {
            Some(PendingEntry::Behavior(behavior)) => ObjectResolution::Matched(behavior, object),
            Some(PendingEntry::Object(displaced)) => {
                warn!("object with attach code {} arrived twice, keeping the newest", code);
                self.entries.insert(code, PendingEntry::Object(object));
                ObjectResolution::Unclaimed(displaced)
            }
            None => {
                if code.is_pending() {
                    self.entries.insert(code, PendingEntry::Object(object));
                    ObjectResolution::Buffered
                } else {
                    ObjectResolution::Unclaimed(object)
                }
            }
        }
    }

    /// Removes every entry still waiting in `partition` and returns the
    /// behaviors, ordered by sequence, so they can be destroyed. Objects left
    /// over for the partition are dropped.
    pub fn drain_unmatched(&mut self, partition: PartitionId) -> Vec<B> {
        let mut codes: Vec<AttachCode> = self
            .entries
            .keys()
            .filter(|code| code.partition_id() == Some(partition))
            .copied()
            .collect();
        codes.sort_by_key(|code| code.sequence());

        let mut behaviors = Vec::new();
        let mut dropped_objects = 0;
        for code in codes {
            match self.entries.remove(&code) {
                Some(PendingEntry::Behavior(behavior)) => behaviors.push(behavior),
                Some(PendingEntry::Object(_)) => dropped_objects += 1,
                None => {}
            }
        }

        if dropped_objects > 0 {
            warn!(
                "dropping {} unclaimed object(s) for partition {}",
                dropped_objects, partition
            );
        }

        behaviors
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, code: &AttachCode) -> bool {
        self.entries.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pending_behavior_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, PendingEntry::Behavior(_)))
            .count()
    }

    pub fn pending_object_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| matches!(entry, PendingEntry::Object(_)))
            .count()
    }

    /// Number of entries, of either kind, waiting in `partition`
    pub fn partition_len(&self, partition: PartitionId) -> usize {
        self.entries
            .keys()
            .filter(|code| code.partition_id() == Some(partition))
            .count()
    }
}

impl<B, O> Default for PendingCreationTable<B, O> {
    fn default() -> Self {
        Self::new()
    }
}

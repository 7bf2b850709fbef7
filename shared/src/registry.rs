use crate::{
    messages::object_messages::ObjectCreate,
    types::{NetworkId, PartitionId},
};

/// The embedding application's view of its networked behaviors and objects.
///
/// `Behavior` is a locally instantiated capability waiting for a network
/// object, `Object` is the handle of an object the network knows about. Once
/// a pair is handed to [`BehaviorRegistry::bind`] the application owns both.
pub trait BehaviorRegistry {
    type Behavior;
    type Object;

    /// Behaviors that exist locally in `partition` but are not bound yet.
    /// The order must be deterministic and identical on every peer, attach
    /// codes are assigned by position in this list.
    fn find_uninitialized_behaviors(&mut self, partition: PartitionId) -> Vec<Self::Behavior>;

    fn create_network_object(&mut self, create: &ObjectCreate) -> Self::Object;

    fn bind(&mut self, behavior: Self::Behavior, object: Self::Object);

    /// Destroys a behavior that will never be bound
    fn destroy(&mut self, behavior: Self::Behavior);

    /// Destroys a network object this peer created through
    /// [`BehaviorRegistry::create_network_object`]
    fn destroy_object(&mut self, network_id: NetworkId);
}

// Message groups reserved by the session layer. Anything at or above
// `APPLICATION_GROUP_START` belongs to the embedding application and is passed
// through untouched.

pub type MessageGroupId = u8;

/// Server -> client: bootstrap one already loaded partition on a new peer
pub const PARTITION_INIT: MessageGroupId = 1;
/// Server -> all: replace every partition with a single one
pub const PARTITION_RESET: MessageGroupId = 2;
/// Server -> all: additively load or unload one partition
pub const PARTITION_CHANGE: MessageGroupId = 3;
/// Client -> server: the requested load or unload has finished
pub const PARTITION_ACK: MessageGroupId = 4;
/// Server -> all: a network object now exists
pub const OBJECT_CREATE: MessageGroupId = 5;
/// Client -> server: please instantiate a network object
pub const OBJECT_CREATE_REQUEST: MessageGroupId = 6;

pub const APPLICATION_GROUP_START: MessageGroupId = 32;

pub fn is_reserved_group(group: MessageGroupId) -> bool {
    group < APPLICATION_GROUP_START
}

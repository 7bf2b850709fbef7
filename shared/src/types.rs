use std::fmt;

pub type PartitionId = u16;
pub type NetworkId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    Server,
    Client,
}

/// Identifies one remote end of a session connection. On a client, the only
/// remote end is the server, which is always [`PeerId::SERVER`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(u64);

impl PeerId {
    pub const SERVER: PeerId = PeerId(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == PeerId::SERVER {
            write!(f, "peer(server)")
        } else {
            write!(f, "peer({})", self.0)
        }
    }
}

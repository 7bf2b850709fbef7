use crate::{messages::session_message::SessionMessage, transport::Recipient};

/// A session message queued for the next flush
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outgoing {
    pub recipient: Recipient,
    pub message: SessionMessage,
}

impl Outgoing {
    pub fn new(recipient: Recipient, message: SessionMessage) -> Self {
        Self { recipient, message }
    }
}

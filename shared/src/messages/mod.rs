pub mod constants;
pub mod error;
pub mod frame;
pub mod object_messages;
pub mod outgoing;
pub mod partition_messages;
pub mod session_message;

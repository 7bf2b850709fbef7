pub mod coordinator;
pub mod error;
pub mod notice;
pub mod partition_set;
pub mod partition_state;

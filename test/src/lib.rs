pub mod local_hub;
pub mod test_registry;

pub use helpers::*;
pub use local_hub::LocalHub;
pub use test_registry::TestRegistry;

pub mod allocator;
#[allow(clippy::module_inception)]
pub mod attach_code;
pub mod error;

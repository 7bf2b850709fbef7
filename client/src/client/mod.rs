mod client;
pub use client::{discover_servers, Client};

mod client_config;
pub use client_config::ClientConfig;

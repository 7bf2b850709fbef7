//! # Vista Directory
//! Asynchronous client for the directory service game servers list
//! themselves on and clients browse. Messages are newline-delimited JSON over
//! short-lived TCP connections.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod connection;
mod directory_client;
mod directory_config;
mod error;
mod messages;
mod registration;

pub use directory_client::DirectoryClient;
pub use directory_config::{DirectoryConfig, GameSettings, TransportKind};
pub use messages::{
    DirectoryQuery, DirectoryRecord, DirectoryRequest, ListingUpdate, ServerDescriptor,
};
pub use registration::{DirectoryRegistration, RegistrationState};

use serde::{Deserialize, Serialize};

use crate::directory_config::{GameSettings, TransportKind};

/// The listing a game server registers with the directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDescriptor {
    pub id: String,
    pub name: String,
    pub port: u16,
    pub player_count: u32,
    pub max_players: u32,
    pub comment: String,
    #[serde(rename = "type")]
    pub game_type: String,
    pub mode: String,
    pub protocol: TransportKind,
    pub elo: i32,
    pub use_elo: bool,
}

impl ServerDescriptor {
    pub fn new(
        settings: &GameSettings,
        port: u16,
        player_count: u32,
        max_players: u32,
        protocol: TransportKind,
    ) -> Self {
        Self {
            id: settings.game_id.clone(),
            name: settings.server_name.clone(),
            port,
            player_count,
            max_players,
            comment: settings.comment.clone(),
            game_type: settings.game_type.clone(),
            mode: settings.game_mode.clone(),
            protocol,
            elo: settings.elo_required,
            use_elo: settings.use_elo,
        }
    }
}

/// A partial listing change. Fields left `None` keep their registered value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Filter for a server query
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryQuery {
    pub id: String,
    #[serde(rename = "type")]
    pub game_type: String,
    pub mode: String,
    pub elo: i32,
}

impl DirectoryQuery {
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self {
            id: settings.game_id.clone(),
            game_type: settings.game_type.clone(),
            mode: settings.game_mode.clone(),
            elo: settings.my_elo,
        }
    }
}

/// One line sent to the directory
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryRequest {
    Register(ServerDescriptor),
    Update(ListingUpdate),
    Get(DirectoryQuery),
}

/// One game server as reported by a query. Missing fields fall back to
/// their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub address: String,
    pub id: String,
    pub port: u16,
    pub name: String,
    pub comment: String,
    #[serde(rename = "type")]
    pub game_type: String,
    pub mode: String,
    pub protocol: TransportKind,
    pub player_count: u32,
    pub max_players: u32,
    pub elo: i32,
    pub use_elo: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct DirectoryResponse {
    #[serde(default)]
    pub hosts: Option<Vec<DirectoryRecord>>,
}

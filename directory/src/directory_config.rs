use std::time::Duration;

use serde::{Deserialize, Serialize};
use vista_shared::ConfigError;

/// Contains settings for reaching the directory service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Host name or address of the directory service
    pub host: String,
    /// TCP port the directory service listens on
    pub port: u16,
    /// How long to wait for the TCP connection to be established
    pub connect_timeout: Duration,
    /// How long a query waits for the directory's answer
    pub response_timeout: Duration,
}

impl DirectoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.port == 0 {
            return Err(ConfigError::ZeroPort {
                setting: "directory.port",
            });
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                setting: "directory.connect_timeout",
            });
        }
        if self.response_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout {
                setting: "directory.response_timeout",
            });
        }
        Ok(())
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 15940,
            connect_timeout: Duration::from_secs(5),
            response_timeout: Duration::from_secs(10),
        }
    }
}

/// The protocol a game server accepts players on, as advertised in its listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    #[default]
    Udp,
    Tcp,
}

/// Describes the game a server hosts or a client looks for
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSettings {
    /// Identifies the game, only listings with the same id are matched
    pub game_id: String,
    /// Display name of a hosted server
    pub server_name: String,
    pub game_type: String,
    pub game_mode: String,
    /// Free-form text shown next to the listing
    pub comment: String,
    /// Whether the listing restricts players by rating
    pub use_elo: bool,
    /// Rating a player needs to join, when `use_elo` is set
    pub elo_required: i32,
    /// The local player's rating, sent along with queries
    pub my_elo: i32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            game_id: "myGame".to_string(),
            server_name: "Forge Game".to_string(),
            game_type: "Deathmatch".to_string(),
            game_mode: "Teams".to_string(),
            comment: String::new(),
            use_elo: false,
            elo_required: 0,
            my_elo: 0,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_id.is_empty() {
            return Err(ConfigError::EmptyGameId);
        }
        Ok(())
    }
}

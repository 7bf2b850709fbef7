use std::default::Default;

use vista_directory::{DirectoryConfig, GameSettings, TransportKind};
use vista_shared::ConfigError;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Port players connect to, advertised in the directory listing
    pub port: u16,
    /// Maximum number of connected players, advertised in the listing
    pub max_players: u32,
    /// Protocol players connect with, advertised in the listing
    pub protocol: TransportKind,
    /// Game the server hosts
    pub game: GameSettings,
    /// Directory to list the server on, if any
    pub directory: Option<DirectoryConfig>,
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::ZeroPort { setting: "port" });
        }
        if self.max_players == 0 {
            return Err(ConfigError::ZeroMaxPlayers);
        }
        self.game.validate()?;
        if let Some(directory) = &self.directory {
            directory.validate()?;
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 15937,
            max_players: 64,
            protocol: TransportKind::Udp,
            game: GameSettings::default(),
            directory: None,
        }
    }
}

use std::default::Default;

use vista_directory::{DirectoryConfig, GameSettings};
use vista_shared::ConfigError;

/// Contains Config properties which will be used by a Client
#[derive(Clone, Debug, Default)]
pub struct ClientConfig {
    /// Game the client plays, used to filter directory queries
    pub game: GameSettings,
    /// Directory to browse for servers, if any
    pub directory: Option<DirectoryConfig>,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        if let Some(directory) = &self.directory {
            directory.validate()?;
        }
        Ok(())
    }
}

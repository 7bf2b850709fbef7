use thiserror::Error;

/// Errors that can occur when a session or directory configuration is checked
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The directory host is empty
    #[error("Directory host must not be empty")]
    EmptyHost,

    /// A port setting is 0
    #[error("Port setting `{setting}` must not be 0")]
    ZeroPort { setting: &'static str },

    /// The server would never accept a player
    #[error("Server max_players must be at least 1")]
    ZeroMaxPlayers,

    /// A timeout setting is zero, every operation would fail immediately
    #[error("Timeout setting `{setting}` must not be zero")]
    ZeroTimeout { setting: &'static str },

    /// The game id identifies the listing, an empty one matches nothing
    #[error("Game id must not be empty")]
    EmptyGameId,
}

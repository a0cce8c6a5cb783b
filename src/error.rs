use thiserror::Error;

use crate::players::PlayerId;

/// Errors starting or configuring a match
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("a party match needs at least one player")]
    NoPlayers,

    #[error("too many players: {count} (max {max})")]
    TooManyPlayers { count: usize, max: usize },

    #[error("player {0} joined twice")]
    DuplicatePlayer(PlayerId),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    #[error("failed to parse settings: {0}")]
    Settings(#[from] serde_json::Error),
}

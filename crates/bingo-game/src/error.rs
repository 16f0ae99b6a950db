//! Error types for the game layer.

use bingo_protocol::PlayerName;

/// Errors that can occur while mutating game state.
///
/// Every failing operation leaves [`GameState`](crate::GameState)
/// exactly as it was.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GameError {
    /// The number is outside `1..=75` or has already been drawn.
    #[error("invalid ball {0}: out of range or already drawn")]
    InvalidBall(u8),

    /// There is no game in `Waiting` or `Playing`.
    #[error("no active game")]
    NoActiveGame,

    /// Reset was requested before any game was ever created.
    #[error("no game to reset")]
    NoGameToReset,

    /// The player holds no card for the active game.
    #[error("player {0} has no card for the active game")]
    NoCard(PlayerName),
}

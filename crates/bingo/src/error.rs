//! Unified error type for the bingo hall.

use bingo_game::GameError;
use bingo_transport::TransportError;

/// Top-level error for the operations callers drive directly.
///
/// The `#[from]` attribute on each variant generates the `From` impl,
/// so `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum BingoError {
    /// A transport-level error (bind, accept, handshake, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A game rule was violated (bad ball, no game to reset).
    #[error(transparent)]
    Game(#[from] GameError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let bingo_err: BingoError = TransportError::Timeout.into();
        assert!(matches!(bingo_err, BingoError::Transport(_)));
        assert_eq!(bingo_err.to_string(), "handshake timed out");
    }

    #[test]
    fn test_from_game_error() {
        let bingo_err: BingoError = GameError::NoGameToReset.into();
        assert!(matches!(
            bingo_err,
            BingoError::Game(GameError::NoGameToReset)
        ));
        assert_eq!(bingo_err.to_string(), "no game to reset");
    }
}

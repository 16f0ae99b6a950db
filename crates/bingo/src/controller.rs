//! Operator commands: draw the next ball, reset the game.

use std::sync::Arc;

use bingo_game::draw_ball;
use bingo_protocol::{Ball, Codec, JsonCodec, ServerEvent};

use crate::{BingoError, SessionHub};

/// Result of asking the cage for another ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOutcome {
    /// A new ball was drawn and broadcast.
    Drawn(Ball),
    /// All 75 balls are out. Nothing changed.
    Exhausted,
    /// The game already has a winner. Nothing changed; reset to play on.
    GameOver,
}

/// The operator's handle on the game.
///
/// Cheap to clone; all clones drive the same hub.
pub struct GameController<C: Codec = JsonCodec> {
    hub: Arc<SessionHub<C>>,
}

impl<C: Codec> Clone for GameController<C> {
    fn clone(&self) -> Self {
        Self {
            hub: Arc::clone(&self.hub),
        }
    }
}

impl<C: Codec> GameController<C> {
    pub fn new(hub: Arc<SessionHub<C>>) -> Self {
        Self { hub }
    }

    /// Draws a ball and broadcasts `new_ball`.
    ///
    /// If no game exists yet, one is started first. A finished game is
    /// left alone until [`reset_game`](Self::reset_game) announces the
    /// next one. The broadcast happens before the game lock is released,
    /// so balls reach every client in draw order.
    ///
    /// # Errors
    /// [`GameError::InvalidBall`](bingo_game::GameError::InvalidBall) if
    /// the cage produced a ball already drawn. The cage only offers
    /// undrawn balls, so this indicates a bug.
    pub async fn draw_next(&self) -> Result<DrawOutcome, BingoError> {
        let mut game = self.hub.game.lock().await;

        if let Some(finished) = game.game().filter(|g| !g.status().is_active()) {
            tracing::info!(game_id = %finished.id(), "game over, reset before drawing");
            return Ok(DrawOutcome::GameOver);
        }
        let current = game.ensure_active_game();
        let game_id = current.id();
        let Some(ball) = draw_ball(current.drawn_set()) else {
            tracing::info!(%game_id, "cage exhausted");
            return Ok(DrawOutcome::Exhausted);
        };
        game.append_ball(ball.number())?;
        tracing::info!(%game_id, %ball, "ball drawn");

        let mut registry = self.hub.registry.lock().await;
        let mut room = self.hub.room.lock().await;
        self.hub
            .fan_out(&mut registry, &mut room, &ServerEvent::NewBall { number: ball });
        Ok(DrawOutcome::Drawn(ball))
    }

    /// Starts a fresh game and broadcasts `game_reset`.
    ///
    /// Every issued card is discarded; players get new ones on their
    /// next card request.
    ///
    /// # Errors
    /// [`GameError::NoGameToReset`](bingo_game::GameError::NoGameToReset)
    /// if no game was ever created. Nothing is broadcast.
    pub async fn reset_game(&self) -> Result<(), BingoError> {
        let mut game = self.hub.game.lock().await;
        let game_id = game.reset()?;
        tracing::info!(%game_id, "game reset");

        let mut registry = self.hub.registry.lock().await;
        let mut room = self.hub.room.lock().await;
        self.hub
            .fan_out(&mut registry, &mut room, &ServerEvent::GameReset);
        Ok(())
    }

    pub fn hub(&self) -> &Arc<SessionHub<C>> {
        &self.hub
    }
}

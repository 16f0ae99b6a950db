//! The single game record and the cards issued for it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use bingo_protocol::{Ball, PlayerName};
use serde::Serialize;

use crate::card::{generate_card, Card};
use crate::engine::{winning_line, Line};
use crate::GameError;

// ---------------------------------------------------------------------------
// GameId / GameStatus
// ---------------------------------------------------------------------------

/// Identity of one game round. A reset starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G-{}", self.0)
    }
}

/// Lifecycle of a game.
///
/// ```text
/// Waiting ──(first ball)──→ Playing ──(valid claim)──→ Finished
///    ↑                                                     │
///    └──────────────────────(reset)────────────────────────┘
/// ```
///
/// A reset is a new game, not a step back: it gets a new [`GameId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

impl GameStatus {
    /// `true` while balls can still be drawn and claims made.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Waiting | Self::Playing)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Playing => write!(f, "PLAYING"),
            Self::Finished => write!(f, "FINISHED"),
        }
    }
}

// ---------------------------------------------------------------------------
// Game
// ---------------------------------------------------------------------------

/// One game round.
#[derive(Debug, Clone)]
pub struct Game {
    id: GameId,
    /// Draw order. Append-only.
    drawn: Vec<Ball>,
    /// Same balls as `drawn`, for membership checks.
    drawn_set: HashSet<Ball>,
    status: GameStatus,
    winner: Option<PlayerName>,
}

impl Game {
    fn new(id: GameId) -> Self {
        Self {
            id,
            drawn: Vec::new(),
            drawn_set: HashSet::new(),
            status: GameStatus::Waiting,
            winner: None,
        }
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    /// Balls in the order they were drawn.
    pub fn drawn(&self) -> &[Ball] {
        &self.drawn
    }

    pub fn drawn_set(&self) -> &HashSet<Ball> {
        &self.drawn_set
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn winner(&self) -> Option<&PlayerName> {
        self.winner.as_ref()
    }
}

/// A serializable view of the current game, for the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSnapshot {
    pub id: GameId,
    pub status: GameStatus,
    pub drawn: Vec<Ball>,
    pub winner: Option<PlayerName>,
}

impl From<&Game> for GameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            id: game.id,
            status: game.status,
            drawn: game.drawn.clone(),
            winner: game.winner.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// The authoritative record of the room's game.
///
/// Holds at most one game (the latest) and the cards issued for it.
/// Cards are keyed by player and belong to the current [`GameId`]: when
/// a new game starts, the old cards are dropped and players receive new
/// ones on their next [`get_or_create_card`](Self::get_or_create_card).
///
/// Not thread-safe by itself. The hub keeps it behind a single lock so
/// draws, claims, and resets never observe each other half-applied.
#[derive(Debug, Default)]
pub struct GameState {
    game: Option<Game>,
    cards: HashMap<PlayerName, Card>,
    last_id: u64,
}

impl GameState {
    /// Creates an empty state with no game record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest game, whatever its status.
    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    /// The latest game if it is still `Waiting` or `Playing`.
    pub fn active_game(&self) -> Option<&Game> {
        self.game.as_ref().filter(|g| g.status.is_active())
    }

    /// Returns the active game, starting a new `Waiting` one if there is
    /// no game yet or the last one finished.
    pub fn ensure_active_game(&mut self) -> &Game {
        if self.active_game().is_none() {
            self.game = None;
        }
        let Self {
            game,
            cards,
            last_id,
        } = self;
        game.get_or_insert_with(|| {
            *last_id += 1;
            cards.clear();
            let id = GameId(*last_id);
            tracing::info!(game_id = %id, "new game created");
            Game::new(id)
        })
    }

    /// Records a drawn ball.
    ///
    /// The first ball moves a `Waiting` game to `Playing`.
    ///
    /// # Errors
    /// - [`GameError::InvalidBall`] if `number` is outside `1..=75` or
    ///   already drawn in this game
    /// - [`GameError::NoActiveGame`] if there is no active game
    pub fn append_ball(&mut self, number: u8) -> Result<Ball, GameError> {
        let ball = Ball::new(number).ok_or(GameError::InvalidBall(number))?;
        let game = self.active_game_mut().ok_or(GameError::NoActiveGame)?;

        if !game.drawn_set.insert(ball) {
            return Err(GameError::InvalidBall(number));
        }
        game.drawn.push(ball);
        if game.status == GameStatus::Waiting {
            game.status = GameStatus::Playing;
            tracing::info!(game_id = %game.id, "game started");
        }
        Ok(ball)
    }

    /// Marks `player` as the winner and finishes the game.
    ///
    /// # Errors
    /// [`GameError::NoActiveGame`] if there is no active game. A finished
    /// game counts as inactive, so a second winner cannot be declared.
    pub fn declare_winner(
        &mut self,
        player: PlayerName,
    ) -> Result<(), GameError> {
        let game = self.active_game_mut().ok_or(GameError::NoActiveGame)?;
        tracing::info!(game_id = %game.id, %player, "winner declared");
        game.winner = Some(player);
        game.status = GameStatus::Finished;
        Ok(())
    }

    /// Starts a new game in place of the current record.
    ///
    /// Drawn balls and the winner are cleared, status returns to
    /// `Waiting`, and every issued card is discarded.
    ///
    /// # Errors
    /// [`GameError::NoGameToReset`] if no game was ever created.
    pub fn reset(&mut self) -> Result<GameId, GameError> {
        if self.game.take().is_none() {
            return Err(GameError::NoGameToReset);
        }
        Ok(self.ensure_active_game().id)
    }

    /// Returns the player's card for the active game, generating and
    /// caching one on first request.
    ///
    /// Starts a new game first if none is active.
    pub fn get_or_create_card(&mut self, player: &PlayerName) -> &Card {
        let game_id = self.ensure_active_game().id;
        self.cards.entry(player.clone()).or_insert_with(|| {
            tracing::debug!(%game_id, %player, "card issued");
            generate_card()
        })
    }

    /// The player's card for the active game, without creating one.
    pub fn card(&self, player: &PlayerName) -> Option<&Card> {
        self.active_game()?;
        self.cards.get(player)
    }

    /// Checks `player`'s card against the balls drawn so far.
    ///
    /// Returns the completed line, or `None` if the card has no full
    /// line yet. Does not modify state.
    ///
    /// # Errors
    /// - [`GameError::NoActiveGame`] if there is no active game
    /// - [`GameError::NoCard`] if the player holds no card for it
    pub fn check_claim(
        &self,
        player: &PlayerName,
    ) -> Result<Option<Line>, GameError> {
        let game = self.active_game().ok_or(GameError::NoActiveGame)?;
        let card = self
            .cards
            .get(player)
            .ok_or_else(|| GameError::NoCard(player.clone()))?;
        Ok(winning_line(card, &game.drawn_set))
    }

    /// A serializable view of the latest game, if any.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.game.as_ref().map(GameSnapshot::from)
    }

    fn active_game_mut(&mut self) -> Option<&mut Game> {
        self.game.as_mut().filter(|g| g.status.is_active())
    }
}

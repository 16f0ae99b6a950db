//! Game rules and state for the bingo hall.
//!
//! Everything here is synchronous and free of I/O. The hub owns a single
//! [`GameState`] behind a lock and calls into it from connection tasks
//! and operator commands.
//!
//! # Key types
//!
//! - [`Card`] / [`generate_card`]: a player's 5×5 grid
//! - [`draw_ball`] / [`validate`]: the cage and the win check
//! - [`GameState`]: the single game record and the cards issued for it
//! - [`GameSchedule`]: when the next game is due

mod card;
mod engine;
mod error;
mod schedule;
mod state;

pub use card::{generate_card, generate_card_with, Card, CARD_SIZE, FREE};
pub use engine::{draw_ball, draw_ball_with, validate, winning_line, Line};
pub use error::GameError;
pub use schedule::{
    GameSchedule, ScheduledGame, StaticGameSchedule, DEFAULT_ROOM_NAME,
};
pub use state::{Game, GameId, GameSnapshot, GameState, GameStatus};

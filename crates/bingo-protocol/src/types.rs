//! Core protocol types for the room's wire format.
//!
//! These are the structures that get serialized to JSON, sent over the
//! WebSocket, and parsed by the browser (or parsed from what the browser
//! sends). The JSON field names are part of the contract with the
//! existing client script, which is why some of them are in Spanish
//! (`usuarios`, `hora`, `faltan`, ...) while the Rust names are English.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The display name of an authenticated player.
///
/// Names are opaque handles issued by the external login layer. The room
/// does not enforce uniqueness; two connections with the same name are
/// the same player as far as cards and presence are concerned.
///
/// `#[serde(transparent)]` serializes `PlayerName("ana")` as `"ana"`.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerName(String);

impl PlayerName {
    /// Wraps a display name. Validation is the authenticator's job.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is on the other end of a connection.
///
/// Anonymous connections are admitted as [`Identity::Guest`]: they show
/// up in the presence roster and can chat, but they hold no card and
/// cannot claim bingo.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    /// An authenticated player.
    Player(PlayerName),
    /// An anonymous visitor sharing the room's guest label.
    Guest,
}

impl Identity {
    /// The label shown in the roster and on chat messages.
    pub fn label<'a>(&'a self, guest_label: &'a str) -> &'a str {
        match self {
            Self::Player(name) => name.as_str(),
            Self::Guest => guest_label,
        }
    }

    /// The player behind this identity, if authenticated.
    pub fn player(&self) -> Option<&PlayerName> {
        match self {
            Self::Player(name) => Some(name),
            Self::Guest => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Ball
// ---------------------------------------------------------------------------

/// A drawn ball: an integer in `1..=75`.
///
/// The constructor is the only way to get a `Ball`, so holding one proves
/// the number is in range. Deserialization goes through the same check
/// via `try_from`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
    Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Ball(u8);

impl Ball {
    /// Lowest ball number.
    pub const MIN: u8 = 1;
    /// Highest ball number.
    pub const MAX: u8 = 75;
    /// Number of balls in the cage.
    pub const COUNT: usize = Self::MAX as usize;

    /// Returns `Some(Ball)` if `number` is in `1..=75`.
    pub fn new(number: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&number).then_some(Self(number))
    }

    /// Returns the ball's number.
    pub fn number(self) -> u8 {
        self.0
    }

    /// Every ball in the cage, in ascending order.
    pub fn all() -> impl Iterator<Item = Ball> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A number outside `1..=75` was offered as a ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("ball number {0} is outside 1..=75")]
pub struct BallOutOfRange(pub u8);

impl TryFrom<u8> for Ball {
    type Error = BallOutOfRange;

    fn try_from(number: u8) -> Result<Self, Self::Error> {
        Ball::new(number).ok_or(BallOutOfRange(number))
    }
}

impl From<Ball> for u8 {
    fn from(ball: Ball) -> u8 {
        ball.0
    }
}

// ---------------------------------------------------------------------------
// ClientMessage: what browsers send
// ---------------------------------------------------------------------------

/// Messages a connected browser can send to the room.
///
/// `#[serde(tag = "type", rename_all = "snake_case")]` produces the
/// internally tagged shape the client script uses:
///   `{ "type": "chat_message", "message": "hola" }`
///   `{ "type": "bingo_claim" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Relay a chat line to everyone in the room.
    ChatMessage {
        /// Relayed verbatim. A missing field relays as an empty line.
        #[serde(default)]
        message: String,
    },

    /// "I have bingo": validate my card against the drawn balls.
    BingoClaim,

    /// Any other `type` tag. Never produced by a well-behaved client;
    /// [`decode_client_message`](crate::decode_client_message) rejects it.
    #[serde(other)]
    Unsupported,
}

// ---------------------------------------------------------------------------
// ServerEvent: what the room broadcasts
// ---------------------------------------------------------------------------

/// Events the room broadcasts to every connection.
///
/// Each variant is a distinct JSON shape with a `type` tag:
///
/// ```text
/// {"type":"broadcast","usuarios":["ana","Guest"],"hora":"09:15:02"}
/// {"type":"chat_message","user":"ana","message":"hola"}
/// {"type":"new_ball","number":42}
/// {"type":"game_over","winner":"ana"}
/// {"type":"game_reset"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// Presence snapshot: who is in the room, and the server's clock.
    #[serde(rename = "broadcast")]
    Presence {
        /// Labels of every connected identity.
        #[serde(rename = "usuarios")]
        members: Vec<String>,
        /// Server wall-clock time as `HH:MM:SS`.
        #[serde(rename = "hora")]
        server_time: String,
    },

    /// A chat line, tagged with its sender's label.
    ChatMessage { user: String, message: String },

    /// The operator drew a ball.
    NewBall { number: Ball },

    /// A claim was validated; the game is over.
    GameOver { winner: String },

    /// The operator started a fresh game.
    GameReset,
}

// ---------------------------------------------------------------------------
// GameStatusSummary: polled by the web layer
// ---------------------------------------------------------------------------

/// The waiting-room status the web layer polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatusSummary {
    /// Server wall-clock time as `HH:MM:SS`.
    #[serde(rename = "hora_servidor")]
    pub server_time: String,
    /// Time of the next scheduled game as `HH:MM:SS`.
    #[serde(rename = "hora_juego")]
    pub game_time: String,
    /// Whole seconds until the next scheduled game.
    #[serde(rename = "faltan")]
    pub seconds_until_game: i64,
    /// Labels of everyone currently connected.
    #[serde(rename = "jugadores")]
    pub players: Vec<String>,
    /// Display name of the room.
    #[serde(rename = "sala_nombre")]
    pub room_name: String,
}

// =========================================================================
// Tests
// =========================================================================

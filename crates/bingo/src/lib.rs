//! # Bingo Hall
//!
//! A real-time, single-room 75-ball bingo server.
//!
//! Players connect over WebSocket, an operator draws balls, and each
//! player's card is checked against the drawn balls when they claim
//! bingo. The [`SessionHub`] keeps the game state, the presence roster,
//! and every connection's outbound channel consistent under concurrent
//! access; the [`GameController`] is the operator's side of it.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bingo::prelude::*;
//!
//! # async fn run() -> Result<(), BingoError> {
//! bingo::init_tracing("info");
//!
//! let server = BingoServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(TrustedNameAuthenticator)
//!     .await?;
//!
//! let controller = server.controller();
//! tokio::spawn(async move {
//!     let _ = controller.draw_next().await;
//! });
//!
//! server.run().await
//! # }
//! ```

mod config;
mod controller;
mod error;
mod handler;
mod hub;
mod server;

pub use config::HubConfig;
pub use controller::{DrawOutcome, GameController};
pub use error::BingoError;
pub use hub::SessionHub;
pub use server::{BingoServer, BingoServerBuilder};

/// Installs a `tracing` fmt subscriber.
///
/// `RUST_LOG` takes precedence over `default_filter`. Calling this more
/// than once is harmless; only the first call installs anything.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Everything needed to run a bingo hall.
pub mod prelude {
    pub use crate::{
        BingoError, BingoServer, BingoServerBuilder, DrawOutcome, GameController,
        HubConfig, SessionHub,
    };
    pub use bingo_game::{
        Card, GameError, GameSchedule, GameSnapshot, GameStatus, ScheduledGame,
        StaticGameSchedule,
    };
    pub use bingo_protocol::{
        Ball, ClientMessage, Codec, GameStatusSummary, Identity, JsonCodec,
        PlayerName, ProtocolError, ServerEvent,
    };
    pub use bingo_room::{EventReceiver, EventSender};
    pub use bingo_session::{
        Authenticator, SessionError, TrustedNameAuthenticator,
    };
    pub use bingo_transport::{ConnectionId, TransportError};
}

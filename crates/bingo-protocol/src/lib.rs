//! Wire protocol for the bingo hall.
//!
//! This crate defines the "language" that browsers and the server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerEvent`], [`Ball`], etc.):
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages
//!   are converted to/from text.
//! - **Errors** ([`ProtocolError`]): what can go wrong during
//!   encoding/decoding.
//!
//! The protocol layer sits between transport (raw frames) and the room
//! hub. It doesn't know about connections or games; it only knows how to
//! serialize and deserialize messages.
//!
//! ```text
//! Transport (frames) → Protocol (ClientMessage / ServerEvent) → Hub
//! ```

mod codec;
mod error;
mod types;

pub use codec::{decode_client_message, Codec};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Ball, BallOutOfRange, ClientMessage, GameStatusSummary, Identity, PlayerName,
    ServerEvent,
};

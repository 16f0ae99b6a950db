//! Transport abstraction layer for the bingo hall.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the network protocol carrying the room's JSON messages.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketHandshake, WebSocketTransport};

use std::fmt;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming peers.
///
/// Accepting is split from the protocol handshake so a peer that never
/// finishes its upgrade only stalls its own task, not the accept loop.
pub trait Transport: Send + Sync + 'static {
    /// A peer whose handshake has not run yet.
    type Handshake: Handshake<Connection = Self::Connection, Error = Self::Error>;
    /// The connection type produced by a completed handshake.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next peer. Reads nothing from it.
    async fn accept(&mut self) -> Result<Self::Handshake, Self::Error>;
}

/// A connected peer that still has to complete the protocol upgrade.
pub trait Handshake: Send + 'static {
    /// The connection produced once the upgrade succeeds.
    type Connection: Connection;
    /// The error type for the upgrade.
    type Error: std::error::Error + Send + Sync;

    /// Runs the upgrade. Callers bound it with a timeout.
    async fn complete(self) -> Result<Self::Connection, Self::Error>;
}

/// A single connection that can send text and receive messages.
///
/// Sending and receiving are independent: a pending `recv` must not
/// hold up a concurrent `send` from another task.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends a text message to the remote peer.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Receives the next message from the remote peer.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection.
    async fn close(&self) -> Result<(), Self::Error>;

    /// The credential presented when the connection was opened, if any.
    fn token(&self) -> Option<&str>;
}

/// Extracts a form-decoded query-string parameter (`a=1&token=x`).
pub fn query_param(query: Option<&str>, key: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query?).ok()?;
    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

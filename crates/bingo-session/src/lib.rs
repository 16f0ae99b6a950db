//! Who is in the bingo hall.
//!
//! This crate answers two questions for the hub:
//!
//! 1. **Identity**: who is behind a new connection ([`Authenticator`],
//!    [`resolve_identity`]). Anyone without a valid credential becomes a
//!    [`Guest`](bingo_protocol::Identity::Guest).
//! 2. **Presence**: which labels are currently connected
//!    ([`RoomRegistry`]).
//!
//! # How it fits in the stack
//!
//! ```text
//! Hub (above)  ← resolves identities on connect, keeps the roster
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below)  ← provides PlayerName, Identity
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod registry;

pub use auth::{resolve_identity, Authenticator, TrustedNameAuthenticator};
pub use error::SessionError;
pub use registry::RoomRegistry;

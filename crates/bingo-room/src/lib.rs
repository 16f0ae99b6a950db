//! The bingo hall's broadcast group.
//!
//! Every open connection is a member of the single [`Room`]. The room
//! holds each member's outbound channel and fans events out to all of
//! them in one pass.
//!
//! # Key types
//!
//! - [`Room`]: members and fan-out
//! - [`Member`]: one connection's identity and outbound channel
//! - [`EventSender`]: the channel a connection's writer drains

mod error;
mod room;

pub use error::RoomError;
pub use room::{EventReceiver, EventSender, Member, Room};

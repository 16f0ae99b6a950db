//! Error types for the room layer.

use bingo_transport::ConnectionId;

/// Errors that can occur during room membership changes.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RoomError {
    /// The connection is not (or no longer) in the room.
    #[error("connection {0} is not in the room")]
    NotMember(ConnectionId),

    /// The connection already joined.
    #[error("connection {0} is already in the room")]
    AlreadyMember(ConnectionId),
}

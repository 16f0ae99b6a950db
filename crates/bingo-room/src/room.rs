//! Room membership and event fan-out.
//!
//! The room is plain data: the hub owns it behind a mutex and calls
//! [`Room::broadcast`] while holding that lock. Because every send is an
//! enqueue onto an unbounded channel, a broadcast never waits on a slow
//! client, and two broadcasts can never interleave. Every member sees
//! events in the same order.

use std::collections::HashMap;

use bingo_protocol::{Identity, ServerEvent};
use bingo_transport::ConnectionId;
use tokio::sync::mpsc;

use crate::RoomError;

/// Channel sender for delivering events to one connection's writer.
pub type EventSender = mpsc::UnboundedSender<ServerEvent>;

/// The receiving half, drained by the connection's writer task.
pub type EventReceiver = mpsc::UnboundedReceiver<ServerEvent>;

/// One connection in the room.
#[derive(Debug)]
pub struct Member {
    identity: Identity,
    /// Roster label, resolved once on join.
    label: String,
    sender: EventSender,
}

impl Member {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The single broadcast group.
#[derive(Debug, Default)]
pub struct Room {
    members: HashMap<ConnectionId, Member>,
}

impl Room {
    /// Creates an empty room.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection to the room.
    ///
    /// # Errors
    /// [`RoomError::AlreadyMember`] if `conn_id` already joined.
    pub fn join(
        &mut self,
        conn_id: ConnectionId,
        identity: Identity,
        label: impl Into<String>,
        sender: EventSender,
    ) -> Result<(), RoomError> {
        if self.members.contains_key(&conn_id) {
            return Err(RoomError::AlreadyMember(conn_id));
        }
        let label = label.into();
        tracing::info!(%conn_id, %label, members = self.members.len() + 1, "joined room");
        self.members.insert(
            conn_id,
            Member {
                identity,
                label,
                sender,
            },
        );
        Ok(())
    }

    /// Removes a connection, returning its membership.
    ///
    /// # Errors
    /// [`RoomError::NotMember`] if `conn_id` is not in the room, including
    /// when a failed broadcast already dropped it.
    pub fn leave(&mut self, conn_id: ConnectionId) -> Result<Member, RoomError> {
        let member = self
            .members
            .remove(&conn_id)
            .ok_or(RoomError::NotMember(conn_id))?;
        tracing::info!(%conn_id, label = %member.label, members = self.members.len(), "left room");
        Ok(member)
    }

    /// Delivers `event` to every member.
    ///
    /// A member whose channel is closed (its writer has gone away) is
    /// removed and the broadcast carries on to the rest. Returns the
    /// members dropped this way so the caller can update the roster.
    pub fn broadcast(&mut self, event: &ServerEvent) -> Vec<(ConnectionId, Member)> {
        let failed: Vec<ConnectionId> = self
            .members
            .iter()
            .filter(|(_, member)| member.sender.send(event.clone()).is_err())
            .map(|(conn_id, _)| *conn_id)
            .collect();

        failed
            .into_iter()
            .filter_map(|conn_id| {
                let member = self.members.remove(&conn_id)?;
                tracing::warn!(%conn_id, label = %member.label, "delivery failed, dropping member");
                Some((conn_id, member))
            })
            .collect()
    }

    /// Looks up a member.
    pub fn member(&self, conn_id: ConnectionId) -> Option<&Member> {
        self.members.get(&conn_id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use bingo_protocol::{Ball, PlayerName};

    use super::*;

    fn cid(n: u64) -> ConnectionId {
        ConnectionId::new(n)
    }

    fn ana() -> Identity {
        Identity::Player(PlayerName::new("ana"))
    }

    fn ball(n: u8) -> ServerEvent {
        ServerEvent::NewBall {
            number: Ball::new(n).unwrap(),
        }
    }

    // =====================================================================
    // join() / leave()
    // =====================================================================

    #[test]
    fn test_join_adds_member() {
        let mut room = Room::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        room.join(cid(1), ana(), "ana", tx).unwrap();

        assert_eq!(room.len(), 1);
        let member = room.member(cid(1)).unwrap();
        assert_eq!(member.label(), "ana");
        assert_eq!(member.identity(), &ana());
    }

    #[test]
    fn test_join_twice_returns_already_member() {
        let mut room = Room::new();
        room.join(cid(1), ana(), "ana", mpsc::unbounded_channel().0)
            .unwrap();
        let result =
            room.join(cid(1), ana(), "ana", mpsc::unbounded_channel().0);
        assert_eq!(result, Err(RoomError::AlreadyMember(cid(1))));
    }

    #[test]
    fn test_leave_returns_membership() {
        let mut room = Room::new();
        room.join(cid(1), Identity::Guest, "Guest", mpsc::unbounded_channel().0)
            .unwrap();

        let member = room.leave(cid(1)).unwrap();
        assert_eq!(member.label(), "Guest");
        assert!(room.is_empty());
    }

    #[test]
    fn test_leave_unknown_returns_not_member() {
        let mut room = Room::new();
        assert!(matches!(room.leave(cid(9)), Err(RoomError::NotMember(id)) if id == cid(9)));
    }

    // =====================================================================
    // broadcast()
    // =====================================================================

    #[test]
    fn test_broadcast_reaches_every_member_in_order() {
        let mut room = Room::new();
        let mut receivers = Vec::new();
        for n in 1..=3 {
            let (tx, rx) = mpsc::unbounded_channel();
            room.join(cid(n), Identity::Guest, "Guest", tx).unwrap();
            receivers.push(rx);
        }

        room.broadcast(&ball(5));
        room.broadcast(&ball(17));

        for rx in &mut receivers {
            assert_eq!(rx.try_recv().unwrap(), ball(5));
            assert_eq!(rx.try_recv().unwrap(), ball(17));
            assert!(rx.try_recv().is_err());
        }
    }

    #[test]
    fn test_broadcast_drops_closed_member_and_continues() {
        let mut room = Room::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let (tx3, mut rx3) = mpsc::unbounded_channel();
        room.join(cid(1), ana(), "ana", tx1).unwrap();
        room.join(cid(2), Identity::Guest, "Guest", tx2).unwrap();
        room.join(cid(3), Identity::Guest, "Guest", tx3).unwrap();
        drop(rx2);

        let dropped = room.broadcast(&ServerEvent::GameReset);

        assert_eq!(dropped.len(), 1);
        assert_eq!(dropped[0].0, cid(2));
        assert_eq!(dropped[0].1.label(), "Guest");
        assert!(room.member(cid(2)).is_none());
        assert_eq!(room.len(), 2);
        assert_eq!(rx1.try_recv().unwrap(), ServerEvent::GameReset);
        assert_eq!(rx3.try_recv().unwrap(), ServerEvent::GameReset);
    }

    #[test]
    fn test_broadcast_empty_room_is_noop() {
        let mut room = Room::new();
        assert!(room.broadcast(&ServerEvent::GameReset).is_empty());
    }
}

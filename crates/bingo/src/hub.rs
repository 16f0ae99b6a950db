//! The session hub: the room's single point of coordination.
//!
//! Every connection task and the operator console go through the hub.
//! It owns three pieces of shared state, each behind its own mutex:
//!
//! ```text
//! game      GameState      drawn balls, status, winner, cards
//! registry  RoomRegistry   roster labels for presence snapshots
//! room      Room           outbound channel per connection
//! ```
//!
//! # Lock order
//!
//! Always `game → registry → room`, skipping any that are not needed,
//! never the other way round. Every broadcast happens with the registry
//! and room locks held, and anything that changes the game also holds
//! the game lock while broadcasting. So all members see events in one
//! total order, and that order matches the order of state changes.

use std::sync::atomic::{AtomicU64, Ordering};

use bingo_game::{Card, GameSchedule, GameSnapshot, GameState};
use bingo_protocol::{
    decode_client_message, ClientMessage, Codec, GameStatusSummary, Identity,
    JsonCodec, PlayerName, ProtocolError, ServerEvent,
};
use bingo_room::{EventSender, Room};
use bingo_session::RoomRegistry;
use bingo_transport::ConnectionId;
use chrono::{Local, NaiveDateTime};
use tokio::sync::Mutex;

use crate::HubConfig;

/// Wall-clock format for presence snapshots and the status summary.
const CLOCK_FORMAT: &str = "%H:%M:%S";

/// Shared state and broadcast fan-out for the single bingo room.
///
/// Share it with `Arc`; every method takes `&self`.
pub struct SessionHub<C: Codec = JsonCodec> {
    pub(crate) game: Mutex<GameState>,
    pub(crate) registry: Mutex<RoomRegistry>,
    pub(crate) room: Mutex<Room>,
    schedule: Box<dyn GameSchedule>,
    config: HubConfig,
    codec: C,
    next_conn_id: AtomicU64,
}

impl SessionHub<JsonCodec> {
    /// Creates a hub that speaks JSON.
    pub fn new(config: HubConfig, schedule: impl GameSchedule) -> Self {
        Self::with_codec(config, schedule, JsonCodec)
    }
}

impl<C: Codec> SessionHub<C> {
    /// Creates a hub with a custom codec.
    pub fn with_codec(
        config: HubConfig,
        schedule: impl GameSchedule,
        codec: C,
    ) -> Self {
        Self {
            game: Mutex::new(GameState::new()),
            registry: Mutex::new(RoomRegistry::new()),
            room: Mutex::new(Room::new()),
            schedule: Box::new(schedule),
            config,
            codec,
            next_conn_id: AtomicU64::new(1),
        }
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    // -----------------------------------------------------------------
    // Membership
    // -----------------------------------------------------------------

    /// Admits a connection to the room and broadcasts the new roster.
    ///
    /// `sender` receives every event broadcast from now on, starting
    /// with the presence snapshot that announces this connection.
    pub async fn connect(
        &self,
        identity: Identity,
        sender: EventSender,
    ) -> ConnectionId {
        let conn_id =
            ConnectionId::new(self.next_conn_id.fetch_add(1, Ordering::Relaxed));
        let label = identity.label(&self.config.guest_label).to_string();

        let mut registry = self.registry.lock().await;
        let mut room = self.room.lock().await;

        registry.join(label.clone());
        if let Err(e) = room.join(conn_id, identity, label.clone(), sender) {
            tracing::warn!(%conn_id, error = %e, "room join failed");
        }
        tracing::info!(%conn_id, %label, "connected");

        let presence = presence_snapshot(&registry);
        self.fan_out(&mut registry, &mut room, &presence);
        conn_id
    }

    /// Removes a connection and broadcasts the new roster.
    ///
    /// Calling it again for the same connection, or for one a failed
    /// broadcast already dropped, does nothing.
    pub async fn disconnect(&self, conn_id: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let mut room = self.room.lock().await;

        let member = match room.leave(conn_id) {
            Ok(member) => member,
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "disconnect ignored");
                return;
            }
        };
        registry.leave(member.label());
        tracing::info!(%conn_id, label = %member.label(), "disconnected");

        let presence = presence_snapshot(&registry);
        self.fan_out(&mut registry, &mut room, &presence);
    }

    // -----------------------------------------------------------------
    // Inbound messages
    // -----------------------------------------------------------------

    /// Decodes one inbound frame and handles it.
    ///
    /// # Errors
    /// Returns the [`ProtocolError`] for malformed frames or unknown
    /// message types. Nothing is broadcast in that case.
    pub async fn handle_frame(
        &self,
        conn_id: ConnectionId,
        data: &[u8],
    ) -> Result<(), ProtocolError> {
        let msg = decode_client_message(&self.codec, data)?;
        self.handle_message(conn_id, msg).await;
        Ok(())
    }

    /// Handles a decoded message from `conn_id`.
    pub async fn handle_message(&self, conn_id: ConnectionId, msg: ClientMessage) {
        match msg {
            ClientMessage::ChatMessage { message } => {
                self.relay_chat(conn_id, message).await;
            }
            ClientMessage::BingoClaim => self.handle_claim(conn_id).await,
            ClientMessage::Unsupported => {
                tracing::debug!(%conn_id, "unsupported message dropped");
            }
        }
    }

    async fn relay_chat(&self, conn_id: ConnectionId, message: String) {
        let mut registry = self.registry.lock().await;
        let mut room = self.room.lock().await;

        let Some(member) = room.member(conn_id) else {
            tracing::debug!(%conn_id, "chat from unknown connection dropped");
            return;
        };
        let event = ServerEvent::ChatMessage {
            user: member.label().to_string(),
            message,
        };
        self.fan_out(&mut registry, &mut room, &event);
    }

    /// Validates a bingo claim against the active game.
    ///
    /// The check and the winner declaration happen under one game lock,
    /// so of several simultaneous true claims exactly one wins; the rest
    /// find the game finished and are dropped.
    async fn handle_claim(&self, conn_id: ConnectionId) {
        let mut game = self.game.lock().await;
        let mut registry = self.registry.lock().await;
        let mut room = self.room.lock().await;

        let Some(player) = room
            .member(conn_id)
            .and_then(|m| m.identity().player())
            .cloned()
        else {
            tracing::debug!(%conn_id, "claim without a player identity dropped");
            return;
        };

        let line = match game.check_claim(&player) {
            Ok(line) => line,
            Err(e) => {
                tracing::debug!(%conn_id, %player, error = %e, "claim dropped");
                return;
            }
        };

        let event = match line {
            Some(line) => {
                if let Err(e) = game.declare_winner(player.clone()) {
                    tracing::warn!(%player, error = %e, "winner not recorded");
                    return;
                }
                tracing::info!(%conn_id, %player, %line, "bingo");
                ServerEvent::GameOver {
                    winner: player.to_string(),
                }
            }
            None => {
                tracing::info!(%conn_id, %player, "claim without a winning line");
                ServerEvent::ChatMessage {
                    user: self.config.system_sender.clone(),
                    message: format!(
                        "❌ {player} called BINGO but has no winning pattern."
                    ),
                }
            }
        };
        self.fan_out(&mut registry, &mut room, &event);
    }

    // -----------------------------------------------------------------
    // Reads for the web layer
    // -----------------------------------------------------------------

    /// The player's card for the active game, issuing one if needed.
    ///
    /// Starts a new game if none is active.
    pub async fn card_for(&self, player: &PlayerName) -> Card {
        self.game.lock().await.get_or_create_card(player).clone()
    }

    /// Labels currently in the roster, sorted.
    pub async fn members(&self) -> Vec<String> {
        self.registry.lock().await.members()
    }

    /// Number of open connections in the room.
    pub async fn connection_count(&self) -> usize {
        self.room.lock().await.len()
    }

    /// The latest game, if any.
    pub async fn snapshot(&self) -> Option<GameSnapshot> {
        self.game.lock().await.snapshot()
    }

    /// Waiting-room summary as of `now` (local time).
    pub async fn status(&self, now: NaiveDateTime) -> GameStatusSummary {
        let next = self.schedule.next_game(now);
        GameStatusSummary {
            server_time: now.format(CLOCK_FORMAT).to_string(),
            game_time: next.at.format(CLOCK_FORMAT).to_string(),
            seconds_until_game: next.seconds_from(now),
            players: self.members().await,
            room_name: next.room_name,
        }
    }

    // -----------------------------------------------------------------
    // Fan-out
    // -----------------------------------------------------------------

    /// Broadcasts `event` to the room.
    ///
    /// Members whose channel turned out to be closed are removed from the
    /// roster too, and the survivors get a fresh presence snapshot.
    pub(crate) fn fan_out(
        &self,
        registry: &mut RoomRegistry,
        room: &mut Room,
        event: &ServerEvent,
    ) {
        let mut dropped = room.broadcast(event);
        // Each round removes at least one member, so this ends.
        while !dropped.is_empty() {
            for (conn_id, member) in &dropped {
                registry.leave(member.label());
                tracing::info!(%conn_id, label = %member.label(), "disconnected");
            }
            dropped = room.broadcast(&presence_snapshot(registry));
        }
    }
}

fn presence_snapshot(registry: &RoomRegistry) -> ServerEvent {
    ServerEvent::Presence {
        members: registry.members(),
        server_time: Local::now().format(CLOCK_FORMAT).to_string(),
    }
}

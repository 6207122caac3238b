use std::sync::Arc;

use crate::config::Config;
use crate::metrics::ServerMetrics;
use crate::protocol::{ConnectionId, PlayerId, ServerMessage};
use crate::room::registry::{RoomRegistry, SharedRoom};
use crate::room::Room;
use crate::session::SessionDirectory;
use thiserror::Error;
use tokio::sync::mpsc;

mod chat;
mod connection_manager;
mod message_router;
mod phase_timers;
mod public_rooms;
mod reconnection_service;
mod room_service;
#[cfg(test)]
mod room_service_tests;
mod round_service;
#[cfg(test)]
pub(crate) mod test_support;

pub use connection_manager::{ConnectionManager, Outbound};

// The error display strings are user-facing Georgian text shared with the
// web client and must not be reworded.

/// Reasons a `room:join` is rejected, surfaced to the joining connection
/// only as `room:error`.
#[derive(Debug, Error)]
pub enum JoinRoomError {
    #[error("ოთახი ვერ მოიძებნა")]
    RoomNotFound,
    #[error("თამაში უკვე დაწყებულია")]
    GameAlreadyStarted,
    #[error("ოთახი სავსეა (მაქს. 8 მოთამაშე)")]
    RoomFull,
}

/// Game-rule violations surfaced to the offending connection only as
/// `game:error`; room state is left unchanged.
#[derive(Debug, Error)]
pub enum GameRuleError {
    #[error("ყველა მოთამაშე მზად არ არის")]
    NotAllReady,
    #[error("თამაში უკვე დაწყებულია")]
    AlreadyStarted,
    #[error("დაელოდეთ ტაიმერს")]
    StopNotArmed,
}

/// The authoritative game server: rooms, sessions, and connections.
///
/// Cross-room state (the registry, the session directory, the connection
/// table) is lock-free concurrent; everything inside a room is serialized
/// behind that room's mutex. Timer callbacks re-acquire the room and check
/// its epoch before mutating.
pub struct GameServer {
    pub(crate) rooms: RoomRegistry,
    pub(crate) sessions: SessionDirectory,
    pub(crate) connections: ConnectionManager,
    config: Config,
    pub(crate) metrics: Arc<ServerMetrics>,
}

impl GameServer {
    pub fn new(config: Config) -> Arc<Self> {
        let metrics = Arc::new(ServerMetrics::new());
        Arc::new(Self {
            rooms: RoomRegistry::new(config.server.room_code_length, config.server.max_players),
            sessions: SessionDirectory::new(),
            connections: ConnectionManager::new(Arc::clone(&metrics)),
            config,
            metrics,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Register a new transport connection and return its id.
    pub fn register_connection(&self, sender: mpsc::Sender<Outbound>) -> ConnectionId {
        self.connections.register(sender)
    }

    /// Transport-level disconnect. Not an error: if the connection was
    /// bound to a player, the player enters the reconnect grace window and
    /// is removed only when it expires.
    ///
    /// A stale transport (one whose player already rebound to a newer
    /// connection) is dropped without touching the player.
    pub async fn unregister_connection(self: &Arc<Self>, connection: ConnectionId) {
        let Some(binding) = self.connections.remove(connection) else {
            return;
        };
        let Some((room_code, player_id)) = binding else {
            tracing::debug!(%connection, "Unbound connection closed");
            return;
        };

        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let mut room = room.lock().await;
        let Some(player) = room.player_mut(player_id) else {
            return;
        };
        if player.connection != Some(connection) {
            // The player already holds a newer transport.
            tracing::debug!(%connection, %player_id, "Stale transport closed, ignoring");
            return;
        }

        player.is_connected = false;
        player.connection = None;
        tracing::info!(
            %player_id,
            room_code = %room_code,
            grace_secs = self.config.server.reconnect_grace_secs,
            "Player disconnected, reconnect grace started"
        );

        let grace = tokio::time::Duration::from_secs(self.config.server.reconnect_grace_secs);
        let server = Arc::clone(self);
        let code = room_code.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(grace).await;
            server.sessions.clear_reconnect_timer(player_id);
            server.expire_disconnected_player(&code, player_id).await;
        });
        self.sessions.arm_reconnect_timer(player_id, task.abort_handle());

        self.broadcast_room_update(&room);
    }

    pub(crate) fn room(&self, code: &str) -> Option<SharedRoom> {
        self.rooms.get(code)
    }

    /// Send one event to a single connection.
    pub(crate) fn send_to(&self, connection: ConnectionId, message: ServerMessage) {
        self.connections
            .send(connection, Outbound::Event(Arc::new(message)));
    }

    pub(crate) fn send_room_error(&self, connection: ConnectionId, error: &JoinRoomError) {
        self.send_to(
            connection,
            ServerMessage::RoomError {
                message: error.to_string(),
            },
        );
    }

    pub(crate) fn send_game_error(&self, connection: ConnectionId, error: &GameRuleError) {
        self.send_to(
            connection,
            ServerMessage::GameError {
                message: error.to_string(),
            },
        );
    }

    /// Broadcast to every connected member, in seat order. Callers hold the
    /// room lock, so clients observe broadcasts in the order the room
    /// produced them.
    pub(crate) fn broadcast(&self, room: &Room, message: ServerMessage) {
        let shared = Arc::new(message);
        for connection in room.connected() {
            self.connections
                .send(connection, Outbound::Event(Arc::clone(&shared)));
        }
    }

    /// Broadcast to every connected member except one player.
    pub(crate) fn broadcast_except(&self, room: &Room, except: PlayerId, message: ServerMessage) {
        let shared = Arc::new(message);
        for player in &room.players {
            if player.id == except || !player.is_connected {
                continue;
            }
            if let Some(connection) = player.connection {
                self.connections
                    .send(connection, Outbound::Event(Arc::clone(&shared)));
            }
        }
    }

    /// Every mutation that changes externally visible room state ends with
    /// this projection broadcast.
    pub(crate) fn broadcast_room_update(&self, room: &Room) {
        self.broadcast(room, ServerMessage::RoomUpdate(Box::new(room.snapshot())));
    }
}

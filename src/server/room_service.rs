use std::sync::Arc;

use crate::protocol::{ConnectionId, Phase, PlayerId, ServerMessage, SettingsPatch};
use crate::room::Player;

use super::{GameServer, JoinRoomError};

const MAX_NICK_CHARS: usize = 32;
const MAX_AVATAR_SEED_CHARS: usize = 64;

fn sanitize_nick(raw: &str) -> String {
    let trimmed: String = raw.trim().chars().take(MAX_NICK_CHARS).collect();
    if trimmed.is_empty() {
        "Guest".to_string()
    } else {
        trimmed
    }
}

fn sanitize_avatar_seed(raw: &str) -> String {
    raw.trim().chars().take(MAX_AVATAR_SEED_CHARS).collect()
}

/// Why a player is being removed from its room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RemovalReason {
    Leave,
    Kick,
    GraceExpired,
}

impl GameServer {
    /// `room:create` — new room with the creator as host.
    pub(super) async fn handle_room_create(
        self: &Arc<Self>,
        connection: ConnectionId,
        nick: String,
        avatar_seed: String,
        token: String,
    ) {
        let nick = sanitize_nick(&nick);
        let avatar_seed = sanitize_avatar_seed(&avatar_seed);
        let token = token.trim().to_string();

        let (code, room) = self.rooms.create();
        let mut room = room.lock().await;

        let session_token = if token.is_empty() { None } else { Some(token) };
        let player = Player::new(nick, avatar_seed, true, connection, session_token.clone());
        let player_id = player.id;
        room.add_player(player);

        if let Some(token) = session_token {
            self.sessions.bind(token, code.clone(), player_id);
        }
        self.connections.bind(connection, code.clone(), player_id);

        self.metrics.increment_rooms_created();
        self.metrics.increment_players_joined();
        tracing::info!(%player_id, room_code = %code, "Room created");

        self.send_to(
            connection,
            ServerMessage::RoomCreated {
                code: code.clone(),
                player_id,
            },
        );
        self.broadcast_room_update(&room);
    }

    /// `room:join` — join an existing lobby. Rejections go only to the
    /// joining connection as `room:error`.
    pub(super) async fn handle_room_join(
        self: &Arc<Self>,
        connection: ConnectionId,
        code: String,
        nick: String,
        avatar_seed: String,
        token: String,
    ) {
        let code = code.trim().to_uppercase();
        let Some(room) = self.rooms.get(&code) else {
            self.send_room_error(connection, &JoinRoomError::RoomNotFound);
            return;
        };
        let mut room = room.lock().await;

        // No entry while a game is running; results and the end screen
        // count as running too.
        if room.state.phase != Phase::Lobby {
            self.send_room_error(connection, &JoinRoomError::GameAlreadyStarted);
            return;
        }
        if room.is_full() {
            self.send_room_error(connection, &JoinRoomError::RoomFull);
            return;
        }

        let nick = sanitize_nick(&nick);
        let avatar_seed = sanitize_avatar_seed(&avatar_seed);
        let token = token.trim().to_string();
        let session_token = if token.is_empty() { None } else { Some(token) };

        let player = Player::new(nick, avatar_seed, false, connection, session_token.clone());
        let player_id = player.id;
        room.add_player(player);

        if let Some(token) = session_token {
            self.sessions.bind(token, code.clone(), player_id);
        }
        self.connections.bind(connection, code.clone(), player_id);

        self.metrics.increment_players_joined();
        tracing::info!(%player_id, room_code = %code, "Player joined room");

        self.send_to(
            connection,
            ServerMessage::RoomJoined {
                code: code.clone(),
                player_id,
            },
        );
        self.broadcast_room_update(&room);
    }

    /// `player:ready` — readiness toggle, meaningful in lobby.
    pub(super) async fn handle_player_ready(self: &Arc<Self>, connection: ConnectionId, ready: bool) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let mut room = room.lock().await;
        let Some(player) = room.player_mut(player_id) else {
            return;
        };
        player.is_ready = ready;
        self.broadcast_room_update(&room);
    }

    /// `settings:update` — host-only merge of a partial settings patch.
    /// Non-host attempts are ignored without a reply.
    pub(super) async fn handle_settings_update(
        self: &Arc<Self>,
        connection: ConnectionId,
        patch: SettingsPatch,
    ) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let mut room = room.lock().await;
        if room.player(player_id).is_none_or(|p| !p.is_host) {
            return;
        }
        if room.state.phase != Phase::Lobby {
            return;
        }
        patch.apply_to(&mut room.settings);
        tracing::debug!(room_code = %room.code, settings = ?room.settings, "Settings updated");
        self.broadcast_room_update(&room);
    }

    /// `room:leave` — the bound player removes itself.
    pub(super) async fn handle_room_leave(self: &Arc<Self>, connection: ConnectionId) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        self.connections.unbind(connection);
        self.remove_player_from_room(&room_code, player_id, RemovalReason::Leave)
            .await;
    }

    /// `player:kick` — host removes another member. Self-kick and non-host
    /// attempts are ignored without a reply.
    pub(super) async fn handle_player_kick(
        self: &Arc<Self>,
        connection: ConnectionId,
        target_player_id: PlayerId,
    ) {
        let Some((room_code, kicker_id)) = self.connections.binding(connection) else {
            return;
        };
        if target_player_id == kicker_id {
            return;
        }
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        {
            let room = room.lock().await;
            if room.player(kicker_id).is_none_or(|p| !p.is_host) {
                return;
            }
            let Some(target) = room.player(target_player_id) else {
                return;
            };
            if let Some(target_connection) = target.connection {
                self.send_to(target_connection, ServerMessage::PlayerKicked);
            }
        }
        self.metrics.increment_players_kicked();
        self.remove_player_from_room(&room_code, target_player_id, RemovalReason::Kick)
            .await;
    }

    /// Reconnect grace expired without a `session:restore`.
    pub(super) async fn expire_disconnected_player(
        self: &Arc<Self>,
        room_code: &str,
        player_id: PlayerId,
    ) {
        {
            let Some(room) = self.rooms.get(room_code) else {
                return;
            };
            let room = room.lock().await;
            // A restore that raced the timer wins.
            if room.player(player_id).is_none_or(|p| p.is_connected) {
                return;
            }
        }
        tracing::info!(%player_id, room_code = %room_code, "Reconnect grace expired");
        self.remove_player_from_room(room_code, player_id, RemovalReason::GraceExpired)
            .await;
    }

    /// Shared removal path for leaves, kicks, and grace expiries: evict the
    /// session, cancel the grace timer, promote a new host if needed, and
    /// delete the room when it empties.
    pub(super) async fn remove_player_from_room(
        self: &Arc<Self>,
        room_code: &str,
        player_id: PlayerId,
        reason: RemovalReason,
    ) {
        let Some(room) = self.rooms.get(room_code) else {
            return;
        };
        let mut room = room.lock().await;
        let Some((removed, promoted)) = room.remove_player(player_id) else {
            return;
        };

        self.sessions.cancel_reconnect_timer(player_id);
        if let Some(token) = &removed.session_token {
            self.sessions.evict(token);
        }
        if let Some(removed_connection) = removed.connection {
            self.connections.unbind(removed_connection);
        }
        self.metrics.increment_players_left();
        tracing::info!(%player_id, room_code = %room_code, ?reason, "Player removed from room");

        if room.is_empty() {
            if self.rooms.remove(room_code).is_some() {
                self.metrics.increment_rooms_deleted();
                tracing::info!(room_code = %room_code, "Room deleted");
            }
            return;
        }

        if let Some(host_id) = promoted {
            self.broadcast(&room, ServerMessage::HostChanged { host_id });
            tracing::info!(room_code = %room_code, new_host = %host_id, "Host changed");
        }
        self.broadcast_room_update(&room);
    }
}

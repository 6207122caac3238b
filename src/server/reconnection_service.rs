use std::sync::Arc;

use crate::protocol::{ConnectionId, PlayerId, ServerMessage, SessionRestoredPayload};

use super::GameServer;

impl GameServer {
    /// `session:restore` — rebind a connection to its previous in-room
    /// identity. Allowed in any phase; a mid-round reconnect receives the
    /// full current game state so the client can resume.
    pub(super) async fn handle_session_restore(
        self: &Arc<Self>,
        connection: ConnectionId,
        token: String,
        player_id: PlayerId,
    ) {
        let Some(room_code) = self.resolve_session(&token, player_id).await else {
            // Whatever the directory held under this token points nowhere.
            self.sessions.evict(&token);
            self.send_to(
                connection,
                ServerMessage::SessionRestored(Box::new(SessionRestoredPayload::failure())),
            );
            tracing::info!(%player_id, "Session restore failed");
            return;
        };

        self.sessions.cancel_reconnect_timer(player_id);

        let Some(room) = self.rooms.get(&room_code) else {
            self.sessions.evict(&token);
            self.send_to(
                connection,
                ServerMessage::SessionRestored(Box::new(SessionRestoredPayload::failure())),
            );
            return;
        };
        let mut room = room.lock().await;
        let Some(player) = room.player_mut(player_id) else {
            self.sessions.evict(&token);
            self.send_to(
                connection,
                ServerMessage::SessionRestored(Box::new(SessionRestoredPayload::failure())),
            );
            return;
        };

        let was_disconnected = !player.is_connected;
        player.is_connected = true;
        // An earlier live transport is silently replaced; its disconnect
        // handler sees the mismatched handle and backs off.
        player.connection = Some(connection);
        self.connections.bind(connection, room_code.clone(), player_id);

        self.metrics.increment_reconnections();
        tracing::info!(
            %player_id,
            room_code = %room_code,
            was_disconnected,
            "Session restored"
        );

        self.send_to(
            connection,
            ServerMessage::SessionRestored(Box::new(SessionRestoredPayload {
                success: true,
                room_code: Some(room_code),
                player_id: Some(player_id),
                room_data: Some(room.snapshot()),
                player_data: room.private_state(player_id),
            })),
        );

        if was_disconnected {
            self.broadcast_except(
                &room,
                player_id,
                ServerMessage::PlayerReconnected { player_id },
            );
        }
        self.broadcast_room_update(&room);
    }

    /// Resolve a session token to a room code. Falls back to a scan of
    /// every room for a player still carrying `(player_id, token)` and
    /// repairs the directory when the scan hits — recovery for a mapping
    /// the directory lost while the player survived.
    async fn resolve_session(&self, token: &str, player_id: PlayerId) -> Option<String> {
        if token.is_empty() {
            return None;
        }

        if let Some(session) = self.sessions.lookup(token) {
            if session.player_id == player_id {
                if let Some(room) = self.rooms.get(&session.room_code) {
                    let room = room.lock().await;
                    if room
                        .player(player_id)
                        .is_some_and(|p| p.session_token.as_deref() == Some(token))
                    {
                        return Some(session.room_code);
                    }
                }
            }
        }

        for room in self.rooms.all() {
            let room = room.lock().await;
            let found = room
                .player(player_id)
                .is_some_and(|p| p.session_token.as_deref() == Some(token));
            if found {
                let code = room.code.clone();
                self.sessions.bind(token.to_string(), code.clone(), player_id);
                tracing::info!(%player_id, room_code = %code, "Session mapping repaired by scan");
                return Some(code);
            }
        }

        None
    }
}

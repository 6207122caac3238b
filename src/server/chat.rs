use std::sync::Arc;

use crate::protocol::{ConnectionId, ServerMessage};

use super::GameServer;

impl GameServer {
    /// `chat:message` — stateless per-room fan-out, truncated to the
    /// configured cap. The sender receives its own message back.
    pub(super) async fn handle_chat_message(
        self: &Arc<Self>,
        connection: ConnectionId,
        message: String,
    ) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        let message: String = message
            .chars()
            .take(self.config().server.chat_message_max_chars)
            .collect();
        if message.trim().is_empty() {
            return;
        }

        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let room = room.lock().await;
        let Some(nick) = room.player(player_id).map(|p| p.nick.clone()) else {
            return;
        };

        self.metrics.increment_chat_messages();
        self.broadcast(
            &room,
            ServerMessage::ChatMessage {
                player_id,
                nick,
                message,
            },
        );
    }
}

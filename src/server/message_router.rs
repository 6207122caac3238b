use std::sync::Arc;

use crate::protocol::{ClientMessage, ConnectionId};

use super::GameServer;

impl GameServer {
    /// Dispatch one decoded client event against the connection it arrived
    /// on. Events for a vanished room or player are dropped silently.
    pub async fn handle_client_message(
        self: &Arc<Self>,
        connection: ConnectionId,
        message: ClientMessage,
    ) {
        match message {
            ClientMessage::SessionRestore { token, player_id } => {
                self.handle_session_restore(connection, token, player_id)
                    .await;
            }
            ClientMessage::RoomCreate {
                nick,
                avatar_seed,
                token,
            } => {
                self.handle_room_create(connection, nick, avatar_seed, token)
                    .await;
            }
            ClientMessage::RoomJoin {
                code,
                nick,
                avatar_seed,
                token,
            } => {
                self.handle_room_join(connection, code, nick, avatar_seed, token)
                    .await;
            }
            ClientMessage::PlayerReady { ready } => {
                self.handle_player_ready(connection, ready).await;
            }
            ClientMessage::SettingsUpdate(patch) => {
                self.handle_settings_update(connection, patch).await;
            }
            ClientMessage::GameStart => {
                self.handle_game_start(connection).await;
            }
            ClientMessage::SticksDraw => {
                self.handle_sticks_draw(connection).await;
            }
            ClientMessage::PlayerTyping { category } => {
                self.handle_player_typing(connection, category).await;
            }
            ClientMessage::AnswersSubmit { answers } => {
                self.handle_answers_submit(connection, answers).await;
            }
            ClientMessage::RoundStop => {
                self.handle_round_stop(connection).await;
            }
            ClientMessage::AnswerInvalidate {
                target_player_id,
                category,
            } => {
                self.handle_answer_invalidate(connection, target_player_id, category)
                    .await;
            }
            ClientMessage::GameNextRound => {
                self.handle_game_next_round(connection).await;
            }
            ClientMessage::GameReturnToLobby => {
                self.handle_return_to_lobby(connection).await;
            }
            ClientMessage::RoomLeave => {
                self.handle_room_leave(connection).await;
            }
            ClientMessage::PlayerKick { target_player_id } => {
                self.handle_player_kick(connection, target_player_id).await;
            }
            ClientMessage::ChatMessage { message } => {
                self.handle_chat_message(connection, message).await;
            }
        }
    }
}

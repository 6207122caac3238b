use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::types::{
    Category, CategoryScore, PlayerId, PlayerPrivateState, PlayerRoundResult, RoomSnapshot,
    SettingsPatch, StandingsEntry,
};

/// Event types sent from client to server.
///
/// Events are adjacently tagged: `{"type": "room:join", "data": {...}}`.
/// The event names and camelCase field names are a compatibility surface
/// shared with the web client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    /// Reclaim an in-room identity after a transport drop
    #[serde(rename = "session:restore", rename_all = "camelCase")]
    SessionRestore { token: String, player_id: PlayerId },
    /// Create a room; the creator becomes host
    #[serde(rename = "room:create", rename_all = "camelCase")]
    RoomCreate {
        nick: String,
        avatar_seed: String,
        /// Opaque client-held token enabling later reconnection
        token: String,
    },
    /// Join an existing lobby by code
    #[serde(rename = "room:join", rename_all = "camelCase")]
    RoomJoin {
        code: String,
        nick: String,
        avatar_seed: String,
        token: String,
    },
    /// Toggle readiness while in lobby
    #[serde(rename = "player:ready")]
    PlayerReady { ready: bool },
    /// Host-only partial settings update
    #[serde(rename = "settings:update")]
    SettingsUpdate(SettingsPatch),
    /// Host starts the game from lobby
    #[serde(rename = "game:start")]
    GameStart,
    /// Host triggers the letter draw animation
    #[serde(rename = "sticks:draw")]
    SticksDraw,
    /// Typing indicator, fanned out to the other members only
    #[serde(rename = "player:typing")]
    PlayerTyping { category: String },
    /// Store the player's answers for the current round
    #[serde(rename = "answers:submit")]
    AnswersSubmit { answers: HashMap<String, String> },
    /// Stop the round (allowed once the min-time timer has fired)
    #[serde(rename = "round:stop")]
    RoundStop,
    /// Toggle validity of another player's answer during results
    #[serde(rename = "answer:invalidate", rename_all = "camelCase")]
    AnswerInvalidate {
        target_player_id: PlayerId,
        category: String,
    },
    /// Host advances past the results screen
    #[serde(rename = "game:nextRound")]
    GameNextRound,
    /// Host returns the room to lobby from results or the end screen
    #[serde(rename = "game:returnToLobby")]
    GameReturnToLobby,
    /// Leave the current room
    #[serde(rename = "room:leave")]
    RoomLeave,
    /// Host removes another player from the room
    #[serde(rename = "player:kick", rename_all = "camelCase")]
    PlayerKick { target_player_id: PlayerId },
    /// Room chat, capped at 200 characters
    #[serde(rename = "chat:message")]
    ChatMessage { message: String },
}

/// Payload for the `session:restored` reply.
/// Boxed in `ServerMessage` to reduce enum size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRestoredPayload {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<PlayerId>,
    /// Full room projection, phase-appropriate so a mid-round client can resume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_data: Option<RoomSnapshot>,
    /// The restoring player's own answers and scores
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_data: Option<PlayerPrivateState>,
}

impl SessionRestoredPayload {
    pub fn failure() -> Self {
        Self {
            success: false,
            room_code: None,
            player_id: None,
            room_data: None,
            player_data: None,
        }
    }
}

/// Event types sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ServerMessage {
    /// Reply to `session:restore`, sent to the restoring connection only
    #[serde(rename = "session:restored")]
    SessionRestored(Box<SessionRestoredPayload>),
    /// Room created; the creator is host
    #[serde(rename = "room:created", rename_all = "camelCase")]
    RoomCreated { code: String, player_id: PlayerId },
    /// Join succeeded; carries the joiner's server-assigned id
    #[serde(rename = "room:joined", rename_all = "camelCase")]
    RoomJoined { code: String, player_id: PlayerId },
    /// Projection of the room, broadcast after every visible mutation
    #[serde(rename = "room:update")]
    RoomUpdate(Box<RoomSnapshot>),
    /// Room-level validation failure (not found / full / not in lobby)
    #[serde(rename = "room:error")]
    RoomError { message: String },
    /// Game-level validation failure; room state unchanged
    #[serde(rename = "game:error")]
    GameError { message: String },
    /// Game left the lobby and entered the draw phase
    #[serde(rename = "game:started")]
    GameStarted,
    /// Draw animation started; `duration` is its length in milliseconds
    #[serde(rename = "sticks:drawing")]
    SticksDrawing { duration: u64 },
    /// The drawn letter, revealed at the end of the animation
    #[serde(rename = "sticks:result")]
    SticksResult { letter: String },
    /// A round began; answers are open
    #[serde(rename = "round:start", rename_all = "camelCase")]
    RoundStart {
        round: u32,
        letter: String,
        categories: Vec<Category>,
        min_time: u64,
    },
    /// The min-time lock expired; `round:stop` is now accepted
    #[serde(rename = "stop:enabled")]
    StopEnabled,
    /// A player stopped the round; scoring runs after the countdown
    #[serde(rename = "round:stopped", rename_all = "camelCase")]
    RoundStopped { countdown: u64, stopped_by: String },
    /// Advisory: every connected player has submitted
    #[serde(rename = "all:submitted")]
    AllSubmitted,
    /// Scored results of the finished round
    #[serde(rename = "round:results", rename_all = "camelCase")]
    RoundResults {
        results: Vec<PlayerRoundResult>,
        is_last_round: bool,
    },
    /// An answer's validity was toggled during results
    #[serde(rename = "answer:invalidated", rename_all = "camelCase")]
    AnswerInvalidated {
        target_player_id: PlayerId,
        category: String,
        score: CategoryScore,
        round_score: i32,
        total_score: i32,
    },
    /// The room moved back to the draw phase for the next round
    #[serde(rename = "phase:sticks")]
    PhaseSticks,
    /// Final standings; the room returns to lobby after a cooldown
    #[serde(rename = "game:ended")]
    GameEnded { standings: Vec<StandingsEntry> },
    /// The room was reset to lobby
    #[serde(rename = "game:reset")]
    GameReset,
    /// Host succession: the named player is now host
    #[serde(rename = "host:changed", rename_all = "camelCase")]
    HostChanged { host_id: PlayerId },
    /// Sent to a player the host removed from the room
    #[serde(rename = "player:kicked")]
    PlayerKicked,
    /// Another member reconnected mid-game
    #[serde(rename = "player:reconnected", rename_all = "camelCase")]
    PlayerReconnected { player_id: PlayerId },
    /// Typing indicator from another member
    #[serde(rename = "player:typing", rename_all = "camelCase")]
    PlayerTyping { player_id: PlayerId, category: String },
    /// Room chat fan-out
    #[serde(rename = "chat:message", rename_all = "camelCase")]
    ChatMessage {
        player_id: PlayerId,
        nick: String,
        message: String,
    },
}

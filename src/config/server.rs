//! Server behavior configuration types.

use super::defaults::{
    default_chat_message_max_chars, default_heartbeat_interval, default_liveness_timeout,
    default_max_message_size, default_max_players, default_reconnect_grace,
    default_room_code_length,
};
use serde::{Deserialize, Serialize};

/// Server configuration for room and connection management.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Maximum players per room
    #[serde(default = "default_max_players")]
    pub max_players: u8,
    /// Length of generated room codes
    #[serde(default = "default_room_code_length")]
    pub room_code_length: usize,
    /// Grace period before a disconnected player is removed (seconds)
    #[serde(default = "default_reconnect_grace")]
    pub reconnect_grace_secs: u64,
    /// Interval between server-initiated WebSocket pings (seconds)
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
    /// A connection silent for this long is closed (seconds)
    #[serde(default = "default_liveness_timeout")]
    pub liveness_timeout_secs: u64,
    /// Chat messages are truncated to this many characters
    #[serde(default = "default_chat_message_max_chars")]
    pub chat_message_max_chars: usize,
    /// Inbound frames larger than this are rejected (bytes)
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_players: default_max_players(),
            room_code_length: default_room_code_length(),
            reconnect_grace_secs: default_reconnect_grace(),
            heartbeat_interval_secs: default_heartbeat_interval(),
            liveness_timeout_secs: default_liveness_timeout(),
            chat_message_max_chars: default_chat_message_max_chars(),
            max_message_size: default_max_message_size(),
        }
    }
}

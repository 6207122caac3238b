//! Default value functions for configuration fields.
//!
//! These back serde's `#[serde(default = ...)]` attributes throughout the
//! configuration system.

// =============================================================================
// Port & Root Config
// =============================================================================

pub const fn default_port() -> u16 {
    3000
}

pub fn default_static_dir() -> String {
    "public".to_string()
}

pub fn default_cors_origins() -> String {
    "*".to_string()
}

// =============================================================================
// Server Defaults
// =============================================================================

pub const fn default_max_players() -> u8 {
    8
}

pub const fn default_room_code_length() -> usize {
    5
}

pub const fn default_reconnect_grace() -> u64 {
    120
}

pub const fn default_heartbeat_interval() -> u64 {
    25
}

pub const fn default_liveness_timeout() -> u64 {
    60
}

pub const fn default_chat_message_max_chars() -> usize {
    200
}

pub const fn default_max_message_size() -> usize {
    65536 // 64KB
}

// =============================================================================
// Timing Defaults
// =============================================================================

pub const fn default_draw_animation_ms() -> u64 {
    2000
}

pub const fn default_letter_reveal_ms() -> u64 {
    1500
}

pub const fn default_stop_countdown_ms() -> u64 {
    5000
}

pub const fn default_end_game_cooldown_ms() -> u64 {
    10_000
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub const fn default_enable_file_logging() -> bool {
    false
}

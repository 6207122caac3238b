//! Phase timer durations. The defaults are the durations the web client
//! animates against; tests shrink them to keep flows fast.

use super::defaults::{
    default_draw_animation_ms, default_end_game_cooldown_ms, default_letter_reveal_ms,
    default_stop_countdown_ms,
};
use serde::{Deserialize, Serialize};

/// Durations of the timed phase transitions.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TimingConfig {
    /// Length of the stick-draw animation (milliseconds)
    #[serde(default = "default_draw_animation_ms")]
    pub draw_animation_ms: u64,
    /// Hold on the revealed letter before the round starts (milliseconds)
    #[serde(default = "default_letter_reveal_ms")]
    pub letter_reveal_ms: u64,
    /// Countdown between a stop call and the scoring pass (milliseconds)
    #[serde(default = "default_stop_countdown_ms")]
    pub stop_countdown_ms: u64,
    /// Cooldown on the end screen before the room resets (milliseconds)
    #[serde(default = "default_end_game_cooldown_ms")]
    pub end_game_cooldown_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            draw_animation_ms: default_draw_animation_ms(),
            letter_reveal_ms: default_letter_reveal_ms(),
            stop_countdown_ms: default_stop_countdown_ms(),
            end_game_cooldown_ms: default_end_game_cooldown_ms(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::game::constants::DEFAULT_CATEGORIES;

/// Unique identifier for players
pub type PlayerId = Uuid;
/// Unique identifier for transport connections
pub type ConnectionId = Uuid;

/// Coarse state of a room, driven by the phase controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Players gather, toggle readiness, and the host tunes settings
    #[default]
    Lobby,
    /// The draw phase: the round's letter is being selected
    Sticks,
    /// Players type answers for the active categories
    Playing,
    /// A stop was called; the countdown to scoring is running
    Stopped,
    /// Scores are visible and open to peer invalidation
    Results,
    /// Final standings are shown before the room returns to lobby
    Ended,
}

/// Per-room game settings, adjustable by the host while in lobby.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    /// Seconds the round must run before stopping is allowed
    pub min_time: u64,
    /// Rounds per game
    pub max_rounds: u32,
    /// Append a random bonus category to every round
    pub use_bonus: bool,
    /// Ordered category names used to assemble each round
    pub categories: Vec<String>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            min_time: 60,
            max_rounds: 3,
            use_bonus: false,
            categories: DEFAULT_CATEGORIES.iter().map(|c| (*c).to_string()).collect(),
        }
    }
}

/// Partial settings update sent by the host; absent fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rounds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_bonus: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl SettingsPatch {
    /// Merge this patch into existing settings. `maxRounds` is clamped to 1
    /// and category names are trimmed with empties dropped.
    pub fn apply_to(&self, settings: &mut GameSettings) {
        if let Some(min_time) = self.min_time {
            settings.min_time = min_time;
        }
        if let Some(max_rounds) = self.max_rounds {
            settings.max_rounds = max_rounds.max(1);
        }
        if let Some(use_bonus) = self.use_bonus {
            settings.use_bonus = use_bonus;
        }
        if let Some(categories) = &self.categories {
            let cleaned: Vec<String> = categories
                .iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect();
            if !cleaned.is_empty() {
                settings.categories = cleaned;
            }
        }
    }
}

/// One active category of the current round. Keys (`cat_0`, `cat_1`, …,
/// `bonus`) are stable for the round and identify categories in all
/// answer and score messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub key: String,
    pub name: String,
}

/// Score of one (player, category) cell as produced by the scoring pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    /// Points awarded by the scoring pass; cached for invalidation toggles
    pub points: i32,
    pub is_valid: bool,
    /// The raw answer as submitted
    pub answer: String,
    /// Id of the player who invalidated this answer, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invalidated_by: Option<PlayerId>,
}

/// Public view of a player, safe to broadcast to the whole room.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPublicInfo {
    pub id: PlayerId,
    pub nick: String,
    pub avatar_seed: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_connected: bool,
    pub has_submitted: bool,
    pub round_score: i32,
    pub total_score: i32,
}

/// Public view of the game state. Excludes per-player answers and the
/// used-letter set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicGameState {
    pub phase: Phase,
    pub current_round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_letter: Option<String>,
    pub active_categories: Vec<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stopped_by: Option<String>,
    pub stop_timer_armed: bool,
    pub all_submitted: bool,
}

/// The `room:update` projection broadcast after every externally visible
/// mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSnapshot {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_id: Option<PlayerId>,
    pub players: Vec<PlayerPublicInfo>,
    pub settings: GameSettings,
    pub public_state: PublicGameState,
}

/// Private per-player state returned only to the owning connection on
/// session restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPrivateState {
    pub answers: HashMap<String, String>,
    pub has_submitted: bool,
    pub category_scores: HashMap<String, CategoryScore>,
    pub round_score: i32,
    pub total_score: i32,
}

/// One player's row in the `round:results` broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRoundResult {
    pub player_id: PlayerId,
    pub nick: String,
    pub category_scores: HashMap<String, CategoryScore>,
    pub round_score: i32,
    pub total_score: i32,
}

/// One row of the final standings, ordered by total score with seat-order
/// tie-breaks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandingsEntry {
    pub rank: u32,
    pub player_id: PlayerId,
    pub nick: String,
    pub total_score: i32,
}

/// Settings subset exposed by the public room listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRoomSettings {
    pub rounds: u32,
    pub has_bonus: bool,
}

/// One joinable room as returned by `GET /api/rooms`. Never exposes
/// session tokens or player identifiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRoomEntry {
    pub code: String,
    pub host_nick: String,
    pub host_avatar: String,
    pub player_count: usize,
    pub max_players: u8,
    pub settings: PublicRoomSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_patch_merges_partial_fields() {
        let mut settings = GameSettings::default();
        let patch = SettingsPatch {
            min_time: Some(0),
            max_rounds: Some(0),
            use_bonus: None,
            categories: Some(vec!["  ქალაქი ".to_string(), String::new()]),
        };
        patch.apply_to(&mut settings);

        assert_eq!(settings.min_time, 0);
        assert_eq!(settings.max_rounds, 1, "maxRounds is clamped to 1");
        assert!(!settings.use_bonus, "untouched fields keep their value");
        assert_eq!(settings.categories, vec!["ქალაქი".to_string()]);
    }

    #[test]
    fn empty_categories_patch_keeps_existing_list() {
        let mut settings = GameSettings::default();
        let before = settings.categories.clone();
        let patch = SettingsPatch {
            categories: Some(vec!["   ".to_string()]),
            ..SettingsPatch::default()
        };
        patch.apply_to(&mut settings);
        assert_eq!(settings.categories, before);
    }

    #[test]
    fn phase_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Phase::Sticks).unwrap(), "\"sticks\"");
        assert_eq!(serde_json::to_string(&Phase::Lobby).unwrap(), "\"lobby\"");
    }
}

// Room state: players in seat order, settings, and the game-state machine.
// All mutation of a room happens behind its registry-owned mutex; the
// methods here assume that serialization and never touch other rooms.

pub mod registry;

use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

use crate::game::letters::random_bonus_category;
use crate::game::scoring::score_round;
use crate::protocol::{
    Category, CategoryScore, ConnectionId, GameSettings, Phase, PlayerId, PlayerPrivateState,
    PlayerPublicInfo, PlayerRoundResult, PublicGameState, RoomSnapshot, StandingsEntry,
};

/// Per-round state of one player. Cleared when a new round begins.
#[derive(Debug, Clone, Default)]
pub struct PlayerRound {
    pub answers: HashMap<String, String>,
    pub has_submitted: bool,
    pub category_scores: HashMap<String, CategoryScore>,
    pub round_score: i32,
}

/// One member of a room. The player's index in `Room::players` is its seat
/// order, used for host succession and standings tie-breaks.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub nick: String,
    pub avatar_seed: String,
    pub is_host: bool,
    pub is_ready: bool,
    pub is_connected: bool,
    /// Current transport binding, or None while disconnected
    pub connection: Option<ConnectionId>,
    /// Opaque client-held token registered in the session directory
    pub session_token: Option<String>,
    pub joined_at: DateTime<Utc>,
    pub round: PlayerRound,
    pub total_score: i32,
}

impl Player {
    pub fn new(
        nick: String,
        avatar_seed: String,
        is_host: bool,
        connection: ConnectionId,
        session_token: Option<String>,
    ) -> Self {
        Self {
            id: PlayerId::new_v4(),
            nick,
            avatar_seed,
            is_host,
            // Hosts are implicitly ready; everyone else opts in
            is_ready: is_host,
            is_connected: true,
            connection: Some(connection),
            session_token,
            joined_at: Utc::now(),
            round: PlayerRound::default(),
            total_score: 0,
        }
    }

    fn public_info(&self) -> PlayerPublicInfo {
        PlayerPublicInfo {
            id: self.id,
            nick: self.nick.clone(),
            avatar_seed: self.avatar_seed.clone(),
            is_host: self.is_host,
            is_ready: self.is_ready,
            is_connected: self.is_connected,
            has_submitted: self.round.has_submitted,
            round_score: self.round.round_score,
            total_score: self.total_score,
        }
    }
}

/// Mutable game state of a room, advanced by the phase controller.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub phase: Phase,
    pub current_round: u32,
    pub current_letter: Option<char>,
    pub used_letters: HashSet<char>,
    pub active_categories: Vec<Category>,
    pub stopped_by: Option<String>,
    pub stop_timer_armed: bool,
    pub all_submitted: bool,
    /// A draw animation is in flight; guards double draws
    pub drawing: bool,
    /// Bumped on every transition. Timer callbacks capture the epoch they
    /// were scheduled under and no-op when the room has moved on.
    pub epoch: u64,
}

/// A room: up to `max_players` players plus shared game state.
#[derive(Debug)]
pub struct Room {
    pub code: String,
    pub settings: GameSettings,
    pub players: Vec<Player>,
    pub state: GameState,
    pub max_players: u8,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(code: String, max_players: u8) -> Self {
        Self {
            code,
            settings: GameSettings::default(),
            players: Vec::new(),
            state: GameState::default(),
            max_players,
            created_at: Utc::now(),
        }
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn host(&self) -> Option<&Player> {
        self.players.iter().find(|p| p.is_host)
    }

    pub fn host_id(&self) -> Option<PlayerId> {
        self.host().map(|h| h.id)
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= usize::from(self.max_players)
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Remove a player. When the host leaves, the next player in seat order
    /// is promoted; the promoted id is returned alongside the removed
    /// player.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<(Player, Option<PlayerId>)> {
        let index = self.players.iter().position(|p| p.id == id)?;
        let removed = self.players.remove(index);

        let promoted = if removed.is_host {
            self.players.first_mut().map(|next| {
                next.is_host = true;
                next.is_ready = true;
                next.id
            })
        } else {
            None
        };

        Some((removed, promoted))
    }

    pub fn bump_epoch(&mut self) -> u64 {
        self.state.epoch += 1;
        self.state.epoch
    }

    /// Every connected player has toggled ready. Disconnected members do
    /// not block the start.
    pub fn all_connected_ready(&self) -> bool {
        self.players
            .iter()
            .filter(|p| p.is_connected)
            .all(|p| p.is_ready)
    }

    pub fn all_connected_submitted(&self) -> bool {
        self.players
            .iter()
            .filter(|p| p.is_connected)
            .all(|p| p.round.has_submitted)
    }

    /// lobby → sticks: a fresh game. Clears the letter pool, all scores,
    /// and the round counter.
    pub fn begin_game(&mut self) {
        self.state.phase = Phase::Sticks;
        self.state.current_round = 0;
        self.state.current_letter = None;
        self.state.used_letters.clear();
        self.state.active_categories.clear();
        self.state.stopped_by = None;
        self.state.stop_timer_armed = false;
        self.state.all_submitted = false;
        self.state.drawing = false;
        for player in &mut self.players {
            player.round = PlayerRound::default();
            player.total_score = 0;
        }
        self.bump_epoch();
    }

    /// sticks → playing: the drawn letter is revealed and a round starts.
    /// Assembles the round's categories from settings.
    pub fn begin_round(&mut self, letter: char) {
        self.state.phase = Phase::Playing;
        self.state.drawing = false;
        self.state.current_round += 1;
        self.state.current_letter = Some(letter);
        self.state.active_categories = self.assemble_categories();
        self.state.stopped_by = None;
        self.state.stop_timer_armed = false;
        self.state.all_submitted = false;
        for player in &mut self.players {
            player.round = PlayerRound::default();
        }
        self.bump_epoch();
    }

    fn assemble_categories(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .settings
            .categories
            .iter()
            .enumerate()
            .map(|(i, name)| Category {
                key: format!("cat_{i}"),
                name: name.clone(),
            })
            .collect();
        if self.settings.use_bonus {
            categories.push(Category {
                key: "bonus".to_string(),
                name: random_bonus_category().to_string(),
            });
        }
        categories
    }

    /// playing → stopped.
    pub fn stop_round(&mut self, stopped_by: String) {
        self.state.phase = Phase::Stopped;
        self.state.stopped_by = Some(stopped_by);
        self.bump_epoch();
    }

    /// stopped → results: run the scoring pass over everyone's answers.
    /// Returns the per-player result rows for the `round:results` broadcast.
    pub fn finish_round(&mut self, letter: char) -> Vec<PlayerRoundResult> {
        self.state.phase = Phase::Results;
        self.bump_epoch();

        let submissions: Vec<(PlayerId, HashMap<String, String>)> = self
            .players
            .iter()
            .map(|p| (p.id, p.round.answers.clone()))
            .collect();
        let mut scores = score_round(&submissions, &self.state.active_categories, letter);

        let mut results = Vec::with_capacity(self.players.len());
        for player in &mut self.players {
            let category_scores = scores.remove(&player.id).unwrap_or_default();
            let round_score: i32 = category_scores.values().map(|s| s.points).sum();
            player.round.category_scores = category_scores.clone();
            player.round.round_score = round_score;
            player.total_score += round_score;
            results.push(PlayerRoundResult {
                player_id: player.id,
                nick: player.nick.clone(),
                category_scores,
                round_score,
                total_score: player.total_score,
            });
        }
        results
    }

    /// Toggle the validity of one scored answer. The decrement/increment
    /// always uses the points cached by the scoring pass. Returns the
    /// updated score cell plus the target's refreshed round and total
    /// scores, or None when the target or cell does not exist.
    pub fn toggle_invalidation(
        &mut self,
        toggler_id: PlayerId,
        target_id: PlayerId,
        category: &str,
    ) -> Option<(CategoryScore, i32, i32)> {
        let target = self.player_mut(target_id)?;
        let score = target.round.category_scores.get_mut(category)?;

        if score.invalidated_by.is_none() {
            score.invalidated_by = Some(toggler_id);
            let points = score.points;
            let updated = score.clone();
            target.round.round_score -= points;
            target.total_score -= points;
            Some((updated, target.round.round_score, target.total_score))
        } else {
            score.invalidated_by = None;
            let points = score.points;
            let updated = score.clone();
            target.round.round_score += points;
            target.total_score += points;
            Some((updated, target.round.round_score, target.total_score))
        }
    }

    /// results → sticks for the next round. Score cells only exist while
    /// the results screen is up.
    pub fn begin_next_round(&mut self) {
        self.state.phase = Phase::Sticks;
        self.state.current_letter = None;
        self.state.stopped_by = None;
        self.state.stop_timer_armed = false;
        self.state.all_submitted = false;
        for player in &mut self.players {
            player.round = PlayerRound::default();
        }
        self.bump_epoch();
    }

    /// results → ended: final standings, sorted by total score descending.
    /// The sort is stable so ties keep seat order.
    pub fn end_game(&mut self) -> Vec<StandingsEntry> {
        self.state.phase = Phase::Ended;
        self.state.current_letter = None;
        for player in &mut self.players {
            player.round = PlayerRound::default();
        }
        self.bump_epoch();

        let mut ranked: Vec<&Player> = self.players.iter().collect();
        ranked.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        ranked
            .iter()
            .enumerate()
            .map(|(i, p)| StandingsEntry {
                rank: u32::try_from(i).unwrap_or(u32::MAX).saturating_add(1),
                player_id: p.id,
                nick: p.nick.clone(),
                total_score: p.total_score,
            })
            .collect()
    }

    /// Back to lobby from results or the end screen. Hosts stay ready.
    pub fn reset_to_lobby(&mut self) {
        self.state.phase = Phase::Lobby;
        self.state.current_round = 0;
        self.state.current_letter = None;
        self.state.used_letters.clear();
        self.state.active_categories.clear();
        self.state.stopped_by = None;
        self.state.stop_timer_armed = false;
        self.state.all_submitted = false;
        self.state.drawing = false;
        for player in &mut self.players {
            player.round = PlayerRound::default();
            player.total_score = 0;
            player.is_ready = player.is_host;
        }
        self.bump_epoch();
    }

    /// Connection ids of every currently connected member, in seat order.
    pub fn connected(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.players.iter().filter_map(|p| {
            if p.is_connected {
                p.connection
            } else {
                None
            }
        })
    }

    /// The `room:update` projection. Excludes per-player answers and the
    /// used-letter set.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            code: self.code.clone(),
            host_id: self.host_id(),
            players: self.players.iter().map(Player::public_info).collect(),
            settings: self.settings.clone(),
            public_state: PublicGameState {
                phase: self.state.phase,
                current_round: self.state.current_round,
                current_letter: self.state.current_letter.map(String::from),
                active_categories: self.state.active_categories.clone(),
                stopped_by: self.state.stopped_by.clone(),
                stop_timer_armed: self.state.stop_timer_armed,
                all_submitted: self.state.all_submitted,
            },
        }
    }

    /// Private state of one player, for the session-restore reply.
    pub fn private_state(&self, id: PlayerId) -> Option<PlayerPrivateState> {
        self.player(id).map(|p| PlayerPrivateState {
            answers: p.round.answers.clone(),
            has_submitted: p.round.has_submitted,
            category_scores: p.round.category_scores.clone(),
            round_score: p.round.round_score,
            total_score: p.total_score,
        })
    }
}

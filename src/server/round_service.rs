use std::collections::HashMap;
use std::sync::Arc;

use crate::game::letters::draw_letter;
use crate::protocol::{ConnectionId, Phase, PlayerId, ServerMessage};
use crate::room::Room;

use super::{GameRuleError, GameServer};

impl GameServer {
    /// `game:start` — host only, from lobby, with every connected player
    /// ready.
    pub(super) async fn handle_game_start(self: &Arc<Self>, connection: ConnectionId) {
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
            self.send_game_error(connection, &GameRuleError::AlreadyStarted);
            return;
        }
        if room.is_empty() || !room.all_connected_ready() {
            self.send_game_error(connection, &GameRuleError::NotAllReady);
            return;
        }

        room.begin_game();
        self.metrics.increment_games_started();
        tracing::info!(room_code = %room.code, "Game started");

        self.broadcast(&room, ServerMessage::GameStarted);
        self.broadcast_room_update(&room);
    }

    /// `sticks:draw` — host only, from the draw phase. Selects the letter
    /// and kicks off the animation timer chain; the room enters playing
    /// when the chain completes.
    pub(super) async fn handle_sticks_draw(self: &Arc<Self>, connection: ConnectionId) {
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
        if room.state.phase != Phase::Sticks || room.state.drawing {
            return;
        }

        let letter = draw_letter(&mut room.state.used_letters);
        room.state.drawing = true;
        let epoch = room.bump_epoch();
        tracing::info!(room_code = %room.code, %letter, "Letter drawn");

        self.broadcast(
            &room,
            ServerMessage::SticksDrawing {
                duration: self.config().timing.draw_animation_ms,
            },
        );
        self.spawn_draw_sequence(room_code, epoch, letter);
    }

    /// Timer-driven sticks → playing transition.
    pub(super) fn begin_round(self: &Arc<Self>, room: &mut Room, letter: char) {
        room.begin_round(letter);
        self.metrics.increment_rounds_played();
        tracing::info!(
            room_code = %room.code,
            round = room.state.current_round,
            %letter,
            "Round started"
        );

        self.broadcast(
            room,
            ServerMessage::RoundStart {
                round: room.state.current_round,
                letter: letter.to_string(),
                categories: room.state.active_categories.clone(),
                min_time: room.settings.min_time,
            },
        );

        if room.settings.min_time == 0 {
            room.state.stop_timer_armed = true;
            self.broadcast(room, ServerMessage::StopEnabled);
        } else {
            self.spawn_min_time_timer(
                room.code.clone(),
                room.state.epoch,
                room.settings.min_time,
            );
        }

        self.broadcast_room_update(room);
    }

    /// `player:typing` — fan out to the other members only.
    pub(super) async fn handle_player_typing(
        self: &Arc<Self>,
        connection: ConnectionId,
        category: String,
    ) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let room = room.lock().await;
        self.broadcast_except(
            &room,
            player_id,
            ServerMessage::PlayerTyping {
                player_id,
                category,
            },
        );
    }

    /// `answers:submit` — store the player's answers. Accepted while
    /// playing and during the stop countdown; the scoring pass reads
    /// whatever was last stored. Keys outside the active categories are
    /// dropped.
    pub(super) async fn handle_answers_submit(
        self: &Arc<Self>,
        connection: ConnectionId,
        answers: HashMap<String, String>,
    ) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let mut room = room.lock().await;
        if !matches!(room.state.phase, Phase::Playing | Phase::Stopped) {
            return;
        }

        let filtered: HashMap<String, String> = answers
            .into_iter()
            .filter(|(key, _)| room.state.active_categories.iter().any(|c| &c.key == key))
            .collect();

        let Some(player) = room.player_mut(player_id) else {
            return;
        };
        player.round.answers = filtered;
        player.round.has_submitted = true;
        tracing::debug!(%player_id, room_code = %room.code, "Answers submitted");

        // Advisory only: submission never ends the round, a stop does.
        if room.state.phase == Phase::Playing
            && !room.state.all_submitted
            && room.all_connected_submitted()
        {
            room.state.all_submitted = true;
            self.broadcast(&room, ServerMessage::AllSubmitted);
        }
        self.broadcast_room_update(&room);
    }

    /// `round:stop` — any player, once the min-time lock has expired.
    pub(super) async fn handle_round_stop(self: &Arc<Self>, connection: ConnectionId) {
        let Some((room_code, player_id)) = self.connections.binding(connection) else {
            return;
        };
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let mut room = room.lock().await;
        if room.state.phase != Phase::Playing {
            return;
        }
        if !room.state.stop_timer_armed {
            self.send_game_error(connection, &GameRuleError::StopNotArmed);
            return;
        }
        let Some(nick) = room.player(player_id).map(|p| p.nick.clone()) else {
            return;
        };

        room.stop_round(nick.clone());
        let epoch = room.state.epoch;
        let countdown_ms = self.config().timing.stop_countdown_ms;
        tracing::info!(room_code = %room.code, stopped_by = %nick, "Round stopped");

        self.broadcast(
            &room,
            ServerMessage::RoundStopped {
                countdown: countdown_ms / 1000,
                stopped_by: nick,
            },
        );
        self.broadcast_room_update(&room);
        self.spawn_stop_countdown(room_code, epoch);
    }

    /// Timer-driven stopped → results transition: the scoring pass.
    pub(super) fn finish_round(self: &Arc<Self>, room: &mut Room) {
        let Some(letter) = room.state.current_letter else {
            // Scoring without a letter is a programming defect; leave the
            // room untouched rather than emit garbage scores.
            tracing::error!(room_code = %room.code, "finish_round without a current letter");
            return;
        };
        let results = room.finish_round(letter);
        let is_last_round = room.state.current_round >= room.settings.max_rounds;
        tracing::info!(
            room_code = %room.code,
            round = room.state.current_round,
            is_last_round,
            "Round scored"
        );

        self.broadcast(
            room,
            ServerMessage::RoundResults {
                results,
                is_last_round,
            },
        );
        self.broadcast_room_update(room);
    }

    /// `answer:invalidate` — any player may toggle any (player, category)
    /// cell while results are up.
    pub(super) async fn handle_answer_invalidate(
        self: &Arc<Self>,
        connection: ConnectionId,
        target_player_id: PlayerId,
        category: String,
    ) {
        let Some((room_code, toggler_id)) = self.connections.binding(connection) else {
            return;
        };
        let Some(room) = self.rooms.get(&room_code) else {
            return;
        };
        let mut room = room.lock().await;
        if room.state.phase != Phase::Results {
            return;
        }
        let Some((score, round_score, total_score)) =
            room.toggle_invalidation(toggler_id, target_player_id, &category)
        else {
            return;
        };
        tracing::debug!(
            room_code = %room.code,
            target = %target_player_id,
            %category,
            invalidated = score.invalidated_by.is_some(),
            "Answer validity toggled"
        );

        self.broadcast(
            &room,
            ServerMessage::AnswerInvalidated {
                target_player_id,
                category,
                score,
                round_score,
                total_score,
            },
        );
        self.broadcast_room_update(&room);
    }

    /// `game:nextRound` — host advances from results to the next draw, or
    /// to the end screen after the last round.
    pub(super) async fn handle_game_next_round(self: &Arc<Self>, connection: ConnectionId) {
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
        if room.state.phase != Phase::Results {
            return;
        }

        if room.state.current_round >= room.settings.max_rounds {
            let standings = room.end_game();
            let epoch = room.state.epoch;
            tracing::info!(room_code = %room.code, "Game ended");

            self.broadcast(&room, ServerMessage::GameEnded { standings });
            self.broadcast_room_update(&room);
            self.spawn_end_cooldown(room_code, epoch);
        } else {
            room.begin_next_round();
            self.broadcast(&room, ServerMessage::PhaseSticks);
            self.broadcast_room_update(&room);
        }
    }

    /// `game:returnToLobby` — host returns the room to lobby early.
    pub(super) async fn handle_return_to_lobby(self: &Arc<Self>, connection: ConnectionId) {
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
        if !matches!(room.state.phase, Phase::Results | Phase::Ended) {
            return;
        }
        self.reset_room_to_lobby(&mut room);
    }

    /// Shared lobby reset used by `game:returnToLobby` and the end-game
    /// cooldown timer.
    pub(super) fn reset_room_to_lobby(self: &Arc<Self>, room: &mut Room) {
        room.reset_to_lobby();
        tracing::info!(room_code = %room.code, "Room reset to lobby");
        self.broadcast(room, ServerMessage::GameReset);
        self.broadcast_room_update(room);
    }
}

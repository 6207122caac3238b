use std::sync::Arc;
use tokio::time::{sleep, Duration};

use crate::protocol::{Phase, ServerMessage};

use super::GameServer;

// Timed phase transitions. Every task captures the epoch it was scheduled
// under, re-acquires the room's lock when it fires, and no-ops when the
// room is gone or has moved on.

impl GameServer {
    /// Draw animation chain: reveal the letter after the animation, then
    /// enter playing after the reveal hold.
    pub(super) fn spawn_draw_sequence(self: &Arc<Self>, room_code: String, epoch: u64, letter: char) {
        let server = Arc::clone(self);
        let animation = Duration::from_millis(self.config().timing.draw_animation_ms);
        let reveal_hold = Duration::from_millis(self.config().timing.letter_reveal_ms);

        tokio::spawn(async move {
            sleep(animation).await;
            {
                let Some(room) = server.room(&room_code) else {
                    return;
                };
                let room = room.lock().await;
                if room.state.epoch != epoch || room.state.phase != Phase::Sticks {
                    return;
                }
                server.broadcast(
                    &room,
                    ServerMessage::SticksResult {
                        letter: letter.to_string(),
                    },
                );
            }

            sleep(reveal_hold).await;
            {
                let Some(room) = server.room(&room_code) else {
                    return;
                };
                let mut room = room.lock().await;
                if room.state.epoch != epoch || room.state.phase != Phase::Sticks {
                    return;
                }
                server.begin_round(&mut room, letter);
            }
        });
    }

    /// Min-time lock: stopping becomes legal once this fires.
    pub(super) fn spawn_min_time_timer(self: &Arc<Self>, room_code: String, epoch: u64, secs: u64) {
        let server = Arc::clone(self);
        tokio::spawn(async move {
            sleep(Duration::from_secs(secs)).await;
            let Some(room) = server.room(&room_code) else {
                return;
            };
            let mut room = room.lock().await;
            if room.state.epoch != epoch || room.state.phase != Phase::Playing {
                return;
            }
            room.state.stop_timer_armed = true;
            server.broadcast(&room, ServerMessage::StopEnabled);
            server.broadcast_room_update(&room);
        });
    }

    /// Stop countdown: the scoring pass runs when it elapses.
    pub(super) fn spawn_stop_countdown(self: &Arc<Self>, room_code: String, epoch: u64) {
        let server = Arc::clone(self);
        let countdown = Duration::from_millis(self.config().timing.stop_countdown_ms);
        tokio::spawn(async move {
            sleep(countdown).await;
            let Some(room) = server.room(&room_code) else {
                return;
            };
            let mut room = room.lock().await;
            if room.state.epoch != epoch || room.state.phase != Phase::Stopped {
                return;
            }
            server.finish_round(&mut room);
        });
    }

    /// End-game cooldown: the room resets to lobby on its own if the host
    /// does not return it earlier.
    pub(super) fn spawn_end_cooldown(self: &Arc<Self>, room_code: String, epoch: u64) {
        let server = Arc::clone(self);
        let cooldown = Duration::from_millis(self.config().timing.end_game_cooldown_ms);
        tokio::spawn(async move {
            sleep(cooldown).await;
            let Some(room) = server.room(&room_code) else {
                return;
            };
            let mut room = room.lock().await;
            if room.state.epoch != epoch || room.state.phase != Phase::Ended {
                return;
            }
            server.reset_room_to_lobby(&mut room);
        });
    }
}

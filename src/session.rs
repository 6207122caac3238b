use dashmap::DashMap;
use tokio::task::AbortHandle;

use crate::protocol::PlayerId;

/// A live token → player mapping. Lives as long as the player exists in
/// its room.
#[derive(Debug, Clone)]
pub struct Session {
    pub room_code: String,
    pub player_id: PlayerId,
}

/// Process-global directory of session tokens and pending-reconnect
/// timers. A token resolves to at most one live player; a player holds at
/// most one pending-reconnect timer.
#[derive(Default)]
pub struct SessionDirectory {
    sessions: DashMap<String, Session>,
    pending: DashMap<PlayerId, AbortHandle>,
}

impl SessionDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or repair a token mapping, replacing any previous entry
    /// under the same token.
    pub fn bind(&self, token: String, room_code: String, player_id: PlayerId) {
        self.sessions.insert(
            token,
            Session {
                room_code,
                player_id,
            },
        );
    }

    pub fn lookup(&self, token: &str) -> Option<Session> {
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    pub fn evict(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Arm the disconnect grace timer for a player. A prior timer (rapid
    /// disconnect/reconnect cycles) is aborted first.
    pub fn arm_reconnect_timer(&self, player_id: PlayerId, handle: AbortHandle) {
        if let Some(previous) = self.pending.insert(player_id, handle) {
            previous.abort();
        }
    }

    /// Cancel a pending-reconnect timer. Returns whether one was armed.
    pub fn cancel_reconnect_timer(&self, player_id: PlayerId) -> bool {
        match self.pending.remove(&player_id) {
            Some((_, handle)) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    /// Drop the timer entry once its task has fired.
    pub fn clear_reconnect_timer(&self, player_id: PlayerId) {
        self.pending.remove(&player_id);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

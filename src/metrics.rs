use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for the in-memory game server. All counters are monotonic
/// except `active_connections` and `active_rooms`, which track live
/// population.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    // Connection metrics
    pub total_connections: AtomicU64,
    pub active_connections: AtomicU64,
    pub messages_dropped: AtomicU64,

    // Room metrics
    pub rooms_created: AtomicU64,
    pub rooms_deleted: AtomicU64,
    pub active_rooms: AtomicU64,

    // Player activity metrics
    pub players_joined: AtomicU64,
    pub players_left: AtomicU64,
    pub players_kicked: AtomicU64,
    pub reconnections: AtomicU64,

    // Game metrics
    pub games_started: AtomicU64,
    pub rounds_played: AtomicU64,
    pub chat_messages: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_total_connections(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn increment_messages_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
        self.active_rooms.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rooms_deleted(&self) {
        self.rooms_deleted.fetch_add(1, Ordering::Relaxed);
        self.active_rooms.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn increment_players_joined(&self) {
        self.players_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_players_left(&self) {
        self.players_left.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_players_kicked(&self) {
        self.players_kicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_reconnections(&self) {
        self.reconnections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_games_started(&self) {
        self.games_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rounds_played(&self) {
        self.rounds_played.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_chat_messages(&self) {
        self.chat_messages.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time view for the `/metrics` endpoint.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_deleted: self.rooms_deleted.load(Ordering::Relaxed),
            active_rooms: self.active_rooms.load(Ordering::Relaxed),
            players_joined: self.players_joined.load(Ordering::Relaxed),
            players_left: self.players_left.load(Ordering::Relaxed),
            players_kicked: self.players_kicked.load(Ordering::Relaxed),
            reconnections: self.reconnections.load(Ordering::Relaxed),
            games_started: self.games_started.load(Ordering::Relaxed),
            rounds_played: self.rounds_played.load(Ordering::Relaxed),
            chat_messages: self.chat_messages.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_connections: u64,
    pub active_connections: u64,
    pub messages_dropped: u64,
    pub rooms_created: u64,
    pub rooms_deleted: u64,
    pub active_rooms: u64,
    pub players_joined: u64,
    pub players_left: u64,
    pub players_kicked: u64,
    pub reconnections: u64,
    pub games_started: u64,
    pub rounds_played: u64,
    pub chat_messages: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_round_trip_through_snapshot() {
        let metrics = ServerMetrics::new();
        metrics.increment_total_connections();
        metrics.increment_total_connections();
        metrics.decrement_active_connections();
        metrics.increment_rooms_created();
        metrics.increment_games_started();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_connections, 2);
        assert_eq!(snapshot.active_connections, 1);
        assert_eq!(snapshot.active_rooms, 1);
        assert_eq!(snapshot.games_started, 1);
    }
}

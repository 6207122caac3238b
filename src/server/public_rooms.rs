use crate::protocol::{Phase, PublicRoomEntry, PublicRoomSettings};

use super::GameServer;

impl GameServer {
    /// Read-only projection behind `GET /api/rooms`: every room still in
    /// lobby with a free seat. Exposes no session tokens and no player
    /// identifiers.
    pub async fn list_public_rooms(&self) -> Vec<PublicRoomEntry> {
        let mut entries = Vec::new();
        for room in self.rooms.all() {
            let room = room.lock().await;
            if room.state.phase != Phase::Lobby || room.is_full() {
                continue;
            }
            let host = room.host();
            entries.push(PublicRoomEntry {
                code: room.code.clone(),
                host_nick: host
                    .map(|h| h.nick.clone())
                    .unwrap_or_else(|| "Guest".to_string()),
                host_avatar: host.map(|h| h.avatar_seed.clone()).unwrap_or_default(),
                player_count: room.players.len(),
                max_players: room.max_players,
                settings: PublicRoomSettings {
                    rounds: room.settings.max_rounds,
                    has_bonus: room.settings.use_bonus,
                },
            });
        }
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        entries
    }
}

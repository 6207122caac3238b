use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::protocol::room_codes::generate_room_code;

use super::Room;

/// A room behind its serialization mutex. Every mutation of the room and
/// its players goes through this lock; timer callbacks re-acquire it and
/// re-check the phase before touching anything.
pub type SharedRoom = Arc<Mutex<Room>>;

/// Process-global index of live rooms by code.
pub struct RoomRegistry {
    rooms: DashMap<String, SharedRoom>,
    code_length: usize,
    max_players: u8,
}

impl RoomRegistry {
    pub fn new(code_length: usize, max_players: u8) -> Self {
        Self {
            rooms: DashMap::new(),
            code_length,
            max_players,
        }
    }

    /// Create a room under a freshly generated unique code.
    pub fn create(&self) -> (String, SharedRoom) {
        loop {
            let code = generate_room_code(self.code_length);
            match self.rooms.entry(code.clone()) {
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    let room = Arc::new(Mutex::new(Room::new(code.clone(), self.max_players)));
                    entry.insert(Arc::clone(&room));
                    return (code, room);
                }
                dashmap::mapref::entry::Entry::Occupied(_) => continue,
            }
        }
    }

    pub fn get(&self, code: &str) -> Option<SharedRoom> {
        self.rooms.get(code).map(|entry| Arc::clone(entry.value()))
    }

    /// Drop a room from the index. Outstanding timer callbacks looking the
    /// room up by code become no-ops.
    pub fn remove(&self, code: &str) -> Option<SharedRoom> {
        self.rooms.remove(code).map(|(_, room)| room)
    }

    /// Snapshot of every live room handle, for the public index and the
    /// session repair scan.
    pub fn all(&self) -> Vec<SharedRoom> {
        self.rooms
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

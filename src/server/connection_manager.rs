use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::metrics::ServerMetrics;
use crate::protocol::{ConnectionId, PlayerId, ServerMessage};

/// Item flowing down a connection's outbound queue. The socket task turns
/// events into text frames and `Ping` into a transport ping.
#[derive(Debug, Clone)]
pub enum Outbound {
    Event(Arc<ServerMessage>),
    Ping,
}

#[derive(Debug)]
struct ConnectionEntry {
    sender: mpsc::Sender<Outbound>,
    /// The player this transport currently speaks for, if any
    binding: Option<(String, PlayerId)>,
}

/// Connection table: transport handles and their player bindings.
/// Connections are owned here; rooms reference them by id only.
pub struct ConnectionManager {
    connections: DashMap<ConnectionId, ConnectionEntry>,
    metrics: Arc<ServerMetrics>,
}

impl ConnectionManager {
    pub fn new(metrics: Arc<ServerMetrics>) -> Self {
        Self {
            connections: DashMap::new(),
            metrics,
        }
    }

    pub fn register(&self, sender: mpsc::Sender<Outbound>) -> ConnectionId {
        let id = ConnectionId::new_v4();
        self.connections.insert(
            id,
            ConnectionEntry {
                sender,
                binding: None,
            },
        );
        self.metrics.increment_total_connections();
        id
    }

    /// Drop a connection, returning its binding (if any) so the caller can
    /// run the disconnect path for the bound player.
    #[allow(clippy::option_option)]
    pub fn remove(&self, id: ConnectionId) -> Option<Option<(String, PlayerId)>> {
        let (_, entry) = self.connections.remove(&id)?;
        self.metrics.decrement_active_connections();
        Some(entry.binding)
    }

    pub fn bind(&self, id: ConnectionId, room_code: String, player_id: PlayerId) {
        if let Some(mut entry) = self.connections.get_mut(&id) {
            entry.binding = Some((room_code, player_id));
        }
    }

    pub fn unbind(&self, id: ConnectionId) {
        if let Some(mut entry) = self.connections.get_mut(&id) {
            entry.binding = None;
        }
    }

    pub fn binding(&self, id: ConnectionId) -> Option<(String, PlayerId)> {
        self.connections.get(&id).and_then(|entry| entry.binding.clone())
    }

    /// Enqueue without blocking. A full queue drops the message rather than
    /// stalling the room; a closed queue means the socket task already died
    /// and cleanup is on its way.
    pub fn send(&self, id: ConnectionId, item: Outbound) {
        let Some(entry) = self.connections.get(&id) else {
            return;
        };
        match entry.sender.try_send(item) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                self.metrics.increment_messages_dropped();
                tracing::warn!(connection = %id, "Outbound queue full, dropping message");
            }
            Err(TrySendError::Closed(_)) => {
                tracing::debug!(connection = %id, "Outbound queue closed");
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn binding_lifecycle() {
        let manager = ConnectionManager::new(Arc::new(ServerMetrics::new()));
        let (tx, _rx) = mpsc::channel(4);
        let id = manager.register(tx);
        let player_id = PlayerId::new_v4();

        assert!(manager.binding(id).is_none());
        manager.bind(id, "AB2CD".to_string(), player_id);
        assert_eq!(manager.binding(id), Some(("AB2CD".to_string(), player_id)));

        manager.unbind(id);
        assert!(manager.binding(id).is_none());

        manager.bind(id, "AB2CD".to_string(), player_id);
        let binding = manager.remove(id).unwrap();
        assert_eq!(binding, Some(("AB2CD".to_string(), player_id)));
        assert!(manager.remove(id).is_none());
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let metrics = Arc::new(ServerMetrics::new());
        let manager = ConnectionManager::new(Arc::clone(&metrics));
        let (tx, _rx) = mpsc::channel(1);
        let id = manager.register(tx);

        manager.send(id, Outbound::Ping);
        manager.send(id, Outbound::Ping);

        assert_eq!(metrics.snapshot().messages_dropped, 1);
    }
}

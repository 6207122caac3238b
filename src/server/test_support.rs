use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use crate::config::Config;
use crate::protocol::{ClientMessage, ConnectionId, PlayerId, ServerMessage};

use super::{GameServer, Outbound};

/// Config with the phase timers compressed so flows finish in
/// milliseconds. The reconnect grace stays at its default; expiry tests
/// override it.
pub(crate) fn fast_config() -> Config {
    let mut config = Config::default();
    config.timing.draw_animation_ms = 10;
    config.timing.letter_reveal_ms = 10;
    config.timing.stop_countdown_ms = 50;
    config.timing.end_game_cooldown_ms = 100;
    config
}

pub(crate) fn test_server() -> Arc<GameServer> {
    GameServer::new(fast_config())
}

/// A fake transport: a registered connection plus its outbound queue.
pub(crate) struct TestClient {
    pub connection: ConnectionId,
    pub rx: mpsc::Receiver<Outbound>,
}

pub(crate) fn connect(server: &Arc<GameServer>) -> TestClient {
    let (tx, rx) = mpsc::channel(256);
    let connection = server.register_connection(tx);
    TestClient { connection, rx }
}

impl TestClient {
    /// Next server event, skipping transport pings.
    pub(crate) async fn recv(&mut self) -> ServerMessage {
        loop {
            let item = timeout(Duration::from_secs(5), self.rx.recv())
                .await
                .expect("timed out waiting for server event")
                .expect("outbound channel closed");
            match item {
                Outbound::Event(event) => return (*event).clone(),
                Outbound::Ping => {}
            }
        }
    }

    /// Receive events until one matches the predicate, returning it.
    pub(crate) async fn recv_until<F>(&mut self, mut matches: F) -> ServerMessage
    where
        F: FnMut(&ServerMessage) -> bool,
    {
        loop {
            let event = self.recv().await;
            if matches(&event) {
                return event;
            }
        }
    }

    /// Throw away everything queued so far.
    pub(crate) fn drain(&mut self) {
        while self.rx.try_recv().is_ok() {}
    }
}

pub(crate) async fn create_room(
    server: &Arc<GameServer>,
    client: &mut TestClient,
    nick: &str,
) -> (String, PlayerId) {
    server
        .handle_client_message(
            client.connection,
            ClientMessage::RoomCreate {
                nick: nick.to_string(),
                avatar_seed: format!("seed-{nick}"),
                token: format!("token-{nick}"),
            },
        )
        .await;
    match client
        .recv_until(|e| matches!(e, ServerMessage::RoomCreated { .. }))
        .await
    {
        ServerMessage::RoomCreated { code, player_id } => (code, player_id),
        other => panic!("unexpected event: {other:?}"),
    }
}

pub(crate) async fn join_room(
    server: &Arc<GameServer>,
    client: &mut TestClient,
    code: &str,
    nick: &str,
) -> PlayerId {
    server
        .handle_client_message(
            client.connection,
            ClientMessage::RoomJoin {
                code: code.to_string(),
                nick: nick.to_string(),
                avatar_seed: format!("seed-{nick}"),
                token: format!("token-{nick}"),
            },
        )
        .await;
    match client
        .recv_until(|e| {
            matches!(
                e,
                ServerMessage::RoomJoined { .. } | ServerMessage::RoomError { .. }
            )
        })
        .await
    {
        ServerMessage::RoomJoined { player_id, .. } => player_id,
        other => panic!("join failed: {other:?}"),
    }
}

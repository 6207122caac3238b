use crate::protocol::ClientMessage;
use crate::server::{GameServer, Outbound};
use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};

pub(super) async fn handle_socket(socket: WebSocket, server: Arc<GameServer>, addr: SocketAddr) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Outbound>(256);

    // The receive loop keeps its own handle for heartbeat pings.
    let ping_tx = tx.clone();

    let connection = server.register_connection(tx);
    tracing::info!(%connection, client_addr = %addr, "WebSocket connection established");

    // Outbound pump: events become text frames, pings become ping frames.
    let send_task = tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            let frame = match item {
                Outbound::Event(event) => match serde_json::to_string(&*event) {
                    Ok(text) => Message::Text(text.into()),
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to encode server event");
                        continue;
                    }
                },
                Outbound::Ping => Message::Ping(Bytes::new()),
            };
            if sender.send(frame).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Inbound loop with heartbeat and liveness tracking. Any inbound frame
    // (pong included) counts as activity.
    let server_recv = Arc::clone(&server);
    let heartbeat = Duration::from_secs(server.config().server.heartbeat_interval_secs.max(1));
    let liveness = Duration::from_secs(server.config().server.liveness_timeout_secs.max(1));
    let max_message_size = server.config().server.max_message_size;
    let receive_task = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(heartbeat);
        ping_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_seen = Instant::now();

        loop {
            tokio::select! {
                message = receiver.next() => {
                    let Some(message) = message else { break };
                    let message = match message {
                        Ok(message) => message,
                        Err(err) => {
                            tracing::debug!(%connection, error = %err, "WebSocket error");
                            break;
                        }
                    };
                    last_seen = Instant::now();

                    match message {
                        Message::Text(text) => {
                            if text.len() > max_message_size {
                                tracing::warn!(
                                    %connection,
                                    size = text.len(),
                                    max = max_message_size,
                                    "Frame exceeds size limit, dropping"
                                );
                                continue;
                            }
                            match serde_json::from_str::<ClientMessage>(&text) {
                                Ok(event) => {
                                    server_recv.handle_client_message(connection, event).await;
                                }
                                Err(err) => {
                                    tracing::warn!(
                                        %connection,
                                        error = %err,
                                        "Rejected malformed client frame"
                                    );
                                }
                            }
                        }
                        Message::Close(_) => {
                            tracing::info!(%connection, "WebSocket closed by client");
                            break;
                        }
                        // Pings are answered by the transport; pongs only
                        // matter as liveness, recorded above.
                        _ => {}
                    }
                }
                _ = ping_interval.tick() => {
                    if last_seen.elapsed() > liveness {
                        tracing::info!(%connection, "Connection silent past liveness timeout, closing");
                        break;
                    }
                    let _ = ping_tx.try_send(Outbound::Ping);
                }
            }
        }

        // Cleanup when receive task ends
        server_recv.unregister_connection(connection).await;
    });

    // Wait for either task to complete
    tokio::select! {
        _ = send_task => {
            tracing::debug!(%connection, "Send task completed");
        }
        _ = receive_task => {
            tracing::debug!(%connection, "Receive task completed");
        }
    }

    // Ensure cleanup; a second call is a no-op.
    server.unregister_connection(connection).await;
}

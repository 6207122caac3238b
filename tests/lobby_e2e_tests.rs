//! End-to-end tests over a real WebSocket connection: the full wire
//! format, room lifecycle, and the HTTP room list.

use futures_util::{SinkExt, StreamExt};
use kalakobana_server::config::Config;
use kalakobana_server::server::GameServer;
use kalakobana_server::websocket;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

async fn spawn_server() -> SocketAddr {
    let mut config = Config::default();
    config.timing.draw_animation_ms = 10;
    config.timing.letter_reveal_ms = 10;
    config.timing.stop_countdown_ms = 50;
    config.timing.end_game_cooldown_ms = 200;
    let cors = config.cors_origins.clone();
    let static_dir = config.static_dir.clone();
    let server = GameServer::new(config);
    let app = websocket::create_router(&cors, &static_dir).with_state(server);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            eprintln!("Test server failed: {e}");
        }
    });
    addr
}

struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    async fn connect(addr: SocketAddr) -> Self {
        let url = format!("ws://{addr}/ws");
        let (stream, _) = timeout(Duration::from_secs(5), connect_async(&url))
            .await
            .expect("connect timed out")
            .expect("connect failed");
        Self { stream }
    }

    async fn send(&mut self, event: Value) {
        let text = serde_json::to_string(&event).expect("serialize event");
        self.stream
            .send(Message::Text(text.into()))
            .await
            .expect("send frame");
    }

    /// Next JSON event, skipping transport control frames.
    async fn recv(&mut self) -> Value {
        loop {
            let frame = timeout(Duration::from_secs(5), self.stream.next())
                .await
                .expect("timed out waiting for frame")
                .expect("stream closed")
                .expect("frame error");
            if let Message::Text(text) = frame {
                return serde_json::from_str(&text).expect("parse event");
            }
        }
    }

    /// Receive events until one carries the given type tag.
    async fn recv_type(&mut self, event_type: &str) -> Value {
        loop {
            let event = self.recv().await;
            if event["type"] == event_type {
                return event;
            }
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn create_join_chat_and_host_succession() {
    let addr = spawn_server().await;

    let mut ana = WsClient::connect(addr).await;
    ana.send(json!({
        "type": "room:create",
        "data": {"nick": "ანა", "avatarSeed": "a1", "token": "tok-ana"}
    }))
    .await;
    let created = ana.recv_type("room:created").await;
    let code = created["data"]["code"].as_str().expect("code").to_string();
    assert_eq!(code.len(), 5);

    let mut beka = WsClient::connect(addr).await;
    beka.send(json!({
        "type": "room:join",
        "data": {"code": code, "nick": "ბექა", "avatarSeed": "b1", "token": "tok-beka"}
    }))
    .await;
    let joined = beka.recv_type("room:joined").await;
    let beka_id = joined["data"]["playerId"]
        .as_str()
        .expect("playerId")
        .to_string();

    // Wait for the membership update showing both seats.
    loop {
        let update = ana.recv_type("room:update").await;
        if update["data"]["players"].as_array().map(Vec::len) == Some(2) {
            assert_eq!(update["data"]["publicState"]["phase"], "lobby");
            break;
        }
    }

    // Chat is relayed to everyone with the cap applied.
    let long_message = "გ".repeat(300);
    beka.send(json!({
        "type": "chat:message",
        "data": {"message": long_message}
    }))
    .await;
    let chat = ana.recv_type("chat:message").await;
    assert_eq!(chat["data"]["nick"], "ბექა");
    assert_eq!(
        chat["data"]["message"].as_str().map(|m| m.chars().count()),
        Some(200),
        "chat messages are capped at 200 characters"
    );

    // The HTTP index lists the lobby without exposing identifiers.
    let rooms: Value = reqwest::get(format!("http://{addr}/api/rooms"))
        .await
        .expect("GET /api/rooms")
        .json()
        .await
        .expect("parse JSON");
    let rooms = rooms.as_array().expect("array");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["hostNick"], "ანა");
    assert_eq!(rooms[0]["playerCount"], 2);
    assert_eq!(rooms[0]["maxPlayers"], 8);
    assert!(rooms[0].get("players").is_none());

    // Host leaves; the second seat inherits the room.
    ana.send(json!({"type": "room:leave"})).await;
    let changed = beka.recv_type("host:changed").await;
    assert_eq!(changed["data"]["hostId"].as_str(), Some(beka_id.as_str()));
}

#[tokio::test(flavor = "multi_thread")]
async fn full_round_over_the_wire() {
    let addr = spawn_server().await;

    let mut ana = WsClient::connect(addr).await;
    ana.send(json!({
        "type": "room:create",
        "data": {"nick": "ანა", "avatarSeed": "a1", "token": "tok-ana"}
    }))
    .await;
    let created = ana.recv_type("room:created").await;
    let code = created["data"]["code"].as_str().expect("code").to_string();

    let mut beka = WsClient::connect(addr).await;
    beka.send(json!({
        "type": "room:join",
        "data": {"code": code, "nick": "ბექა", "avatarSeed": "b1", "token": "tok-beka"}
    }))
    .await;
    beka.recv_type("room:joined").await;

    beka.send(json!({"type": "player:ready", "data": {"ready": true}}))
        .await;
    ana.send(json!({
        "type": "settings:update",
        "data": {"minTime": 0, "maxRounds": 1, "useBonus": false, "categories": ["ქალაქი"]}
    }))
    .await;

    ana.send(json!({"type": "game:start"})).await;
    ana.recv_type("game:started").await;
    ana.send(json!({"type": "sticks:draw"})).await;
    ana.recv_type("sticks:drawing").await;
    ana.recv_type("sticks:result").await;

    let start = ana.recv_type("round:start").await;
    let letter = start["data"]["letter"].as_str().expect("letter").to_string();
    assert_eq!(start["data"]["round"], 1);
    assert_eq!(start["data"]["categories"][0]["key"], "cat_0");
    ana.recv_type("stop:enabled").await;

    ana.send(json!({
        "type": "answers:submit",
        "data": {"answers": {"cat_0": format!("{letter}ათუმი")}}
    }))
    .await;
    beka.send(json!({
        "type": "answers:submit",
        "data": {"answers": {"cat_0": format!("{letter}ერლინი")}}
    }))
    .await;
    ana.recv_type("all:submitted").await;

    ana.send(json!({"type": "round:stop"})).await;
    let stopped = ana.recv_type("round:stopped").await;
    assert_eq!(stopped["data"]["stoppedBy"], "ანა");

    let results = ana.recv_type("round:results").await;
    assert_eq!(results["data"]["isLastRound"], true);
    for row in results["data"]["results"].as_array().expect("results") {
        assert_eq!(row["roundScore"], 20);
        assert_eq!(row["categoryScores"]["cat_0"]["isValid"], true);
    }

    ana.send(json!({"type": "game:nextRound"})).await;
    let ended = ana.recv_type("game:ended").await;
    let standings = ended["data"]["standings"].as_array().expect("standings");
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0]["rank"], 1);
    assert_eq!(standings[0]["totalScore"], 20);

    // Cooldown brings the room back to lobby for both clients.
    beka.recv_type("game:reset").await;
    ana.recv_type("game:reset").await;
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_before_timer_is_rejected_over_the_wire() {
    let addr = spawn_server().await;

    let mut ana = WsClient::connect(addr).await;
    ana.send(json!({
        "type": "room:create",
        "data": {"nick": "ანა", "avatarSeed": "a1", "token": "tok-ana"}
    }))
    .await;
    ana.recv_type("room:created").await;

    ana.send(json!({
        "type": "settings:update",
        "data": {"minTime": 60, "maxRounds": 1}
    }))
    .await;
    ana.send(json!({"type": "game:start"})).await;
    ana.send(json!({"type": "sticks:draw"})).await;
    ana.recv_type("round:start").await;

    ana.send(json!({"type": "round:stop"})).await;
    let error = ana.recv_type("game:error").await;
    assert_eq!(error["data"]["message"], "დაელოდეთ ტაიმერს");
}

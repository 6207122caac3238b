use crate::protocol::{
    room_codes::ROOM_CODE_ALPHABET, ClientMessage, Phase, ServerMessage, SettingsPatch,
};

use super::test_support::{connect, create_room, join_room, test_server};

#[tokio::test]
async fn create_room_assigns_host_and_clean_code() {
    let server = test_server();
    let mut host = connect(&server);

    let (code, host_id) = create_room(&server, &mut host, "გიო").await;
    assert_eq!(code.len(), 5);
    assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)));

    let update = host
        .recv_until(|e| matches!(e, ServerMessage::RoomUpdate(_)))
        .await;
    let ServerMessage::RoomUpdate(snapshot) = update else {
        unreachable!();
    };
    assert_eq!(snapshot.host_id, Some(host_id));
    assert_eq!(snapshot.players.len(), 1);
    assert!(snapshot.players[0].is_host);
    assert!(snapshot.players[0].is_ready, "hosts are implicitly ready");
    assert_eq!(snapshot.public_state.phase, Phase::Lobby);
}

#[tokio::test]
async fn join_unknown_room_fails_with_room_error() {
    let server = test_server();
    let mut client = connect(&server);

    server
        .handle_client_message(
            client.connection,
            ClientMessage::RoomJoin {
                code: "ZZZZZ".to_string(),
                nick: "ნინო".to_string(),
                avatar_seed: "s".to_string(),
                token: "t".to_string(),
            },
        )
        .await;

    let event = client.recv().await;
    match event {
        ServerMessage::RoomError { message } => assert_eq!(message, "ოთახი ვერ მოიძებნა"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn join_is_case_insensitive_on_the_code() {
    let server = test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);

    let (code, _) = create_room(&server, &mut host, "a").await;
    join_room(&server, &mut guest, &code.to_lowercase(), "b").await;
}

#[tokio::test]
async fn full_room_rejects_the_ninth_player() {
    let server = test_server();
    let mut host = connect(&server);
    let (code, _) = create_room(&server, &mut host, "host").await;

    for i in 0..7 {
        let mut guest = connect(&server);
        join_room(&server, &mut guest, &code, &format!("p{i}")).await;
    }

    let mut ninth = connect(&server);
    server
        .handle_client_message(
            ninth.connection,
            ClientMessage::RoomJoin {
                code: code.clone(),
                nick: "ninth".to_string(),
                avatar_seed: "s".to_string(),
                token: "t9".to_string(),
            },
        )
        .await;
    match ninth.recv().await {
        ServerMessage::RoomError { message } => {
            assert_eq!(message, "ოთახი სავსეა (მაქს. 8 მოთამაშე)");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn joining_a_started_game_is_rejected() {
    let server = test_server();
    let mut host = connect(&server);
    let (code, _) = create_room(&server, &mut host, "host").await;

    server
        .handle_client_message(host.connection, ClientMessage::GameStart)
        .await;
    host.recv_until(|e| matches!(e, ServerMessage::GameStarted))
        .await;

    let mut late = connect(&server);
    server
        .handle_client_message(
            late.connection,
            ClientMessage::RoomJoin {
                code,
                nick: "late".to_string(),
                avatar_seed: "s".to_string(),
                token: "tl".to_string(),
            },
        )
        .await;
    match late.recv().await {
        ServerMessage::RoomError { message } => assert_eq!(message, "თამაში უკვე დაწყებულია"),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn host_leave_promotes_next_seat_and_evicts_session() {
    let server = test_server();
    let mut host = connect(&server);
    let mut second = connect(&server);
    let mut third = connect(&server);

    let (code, _) = create_room(&server, &mut host, "host").await;
    let second_id = join_room(&server, &mut second, &code, "second").await;
    join_room(&server, &mut third, &code, "third").await;
    second.drain();

    server
        .handle_client_message(host.connection, ClientMessage::RoomLeave)
        .await;

    let event = second
        .recv_until(|e| matches!(e, ServerMessage::HostChanged { .. }))
        .await;
    match event {
        ServerMessage::HostChanged { host_id } => assert_eq!(host_id, second_id),
        other => panic!("unexpected event: {other:?}"),
    }

    let update = second
        .recv_until(|e| matches!(e, ServerMessage::RoomUpdate(_)))
        .await;
    let ServerMessage::RoomUpdate(snapshot) = update else {
        unreachable!();
    };
    assert_eq!(snapshot.players.len(), 2);
    assert_eq!(snapshot.host_id, Some(second_id));

    assert!(
        server.sessions.lookup("token-host").is_none(),
        "leaver's session must be evicted"
    );
}

#[tokio::test]
async fn last_leave_deletes_the_room() {
    let server = test_server();
    let mut host = connect(&server);
    let (code, _) = create_room(&server, &mut host, "solo").await;
    assert_eq!(server.rooms.len(), 1);

    server
        .handle_client_message(host.connection, ClientMessage::RoomLeave)
        .await;

    assert!(server.rooms.get(&code).is_none());
    assert_eq!(server.rooms.len(), 0);
    assert!(server.sessions.lookup("token-solo").is_none());
}

#[tokio::test]
async fn kick_notifies_target_and_removes_it() {
    let server = test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);

    let (code, _) = create_room(&server, &mut host, "host").await;
    let guest_id = join_room(&server, &mut guest, &code, "guest").await;
    guest.drain();

    server
        .handle_client_message(
            host.connection,
            ClientMessage::PlayerKick {
                target_player_id: guest_id,
            },
        )
        .await;

    guest
        .recv_until(|e| matches!(e, ServerMessage::PlayerKicked))
        .await;

    let room = server.rooms.get(&code).expect("room still exists");
    let room = room.lock().await;
    assert!(room.player(guest_id).is_none());
    assert_eq!(room.players.len(), 1);
}

#[tokio::test]
async fn kick_by_non_host_and_self_kick_are_ignored() {
    let server = test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);

    let (code, host_id) = create_room(&server, &mut host, "host").await;
    let guest_id = join_room(&server, &mut guest, &code, "guest").await;

    server
        .handle_client_message(
            guest.connection,
            ClientMessage::PlayerKick {
                target_player_id: host_id,
            },
        )
        .await;
    server
        .handle_client_message(
            host.connection,
            ClientMessage::PlayerKick {
                target_player_id: host_id,
            },
        )
        .await;

    let room = server.rooms.get(&code).expect("room still exists");
    let room = room.lock().await;
    assert_eq!(room.players.len(), 2);
    assert!(room.player(host_id).is_some());
    assert!(room.player(guest_id).is_some());
}

#[tokio::test]
async fn ready_toggle_is_rebroadcast() {
    let server = test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);

    let (code, _) = create_room(&server, &mut host, "host").await;
    let guest_id = join_room(&server, &mut guest, &code, "guest").await;
    host.drain();

    server
        .handle_client_message(guest.connection, ClientMessage::PlayerReady { ready: true })
        .await;

    let update = host
        .recv_until(|e| matches!(e, ServerMessage::RoomUpdate(_)))
        .await;
    let ServerMessage::RoomUpdate(snapshot) = update else {
        unreachable!();
    };
    let guest_info = snapshot
        .players
        .iter()
        .find(|p| p.id == guest_id)
        .expect("guest present");
    assert!(guest_info.is_ready);
}

#[tokio::test]
async fn settings_update_is_host_only() {
    let server = test_server();
    let mut host = connect(&server);
    let mut guest = connect(&server);

    let (code, _) = create_room(&server, &mut host, "host").await;
    join_room(&server, &mut guest, &code, "guest").await;

    server
        .handle_client_message(
            guest.connection,
            ClientMessage::SettingsUpdate(SettingsPatch {
                max_rounds: Some(9),
                ..SettingsPatch::default()
            }),
        )
        .await;
    {
        let room = server.rooms.get(&code).unwrap();
        let room = room.lock().await;
        assert_ne!(room.settings.max_rounds, 9, "non-host update must be ignored");
    }

    server
        .handle_client_message(
            host.connection,
            ClientMessage::SettingsUpdate(SettingsPatch {
                max_rounds: Some(9),
                min_time: Some(0),
                ..SettingsPatch::default()
            }),
        )
        .await;
    let room = server.rooms.get(&code).unwrap();
    let room = room.lock().await;
    assert_eq!(room.settings.max_rounds, 9);
    assert_eq!(room.settings.min_time, 0);
}

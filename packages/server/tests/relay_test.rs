//! Integration tests for the tap relay, running the real server in-process on
//! ephemeral ports.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt, future::join_all};
use serde_json::json;
use tapbridge_server::{
    infrastructure::{
        dto::websocket::ServerMessage, forwarder::UdpTapForwarder,
        message_pusher::WebSocketMessagePusher, repository::InMemoryParticipantRepository,
    },
    ui::Server,
    usecase::{
        ConnectParticipantUseCase, DisconnectParticipantUseCase, RenameParticipantUseCase,
        SendTapUseCase,
    },
};
use tapbridge_shared::time::{SystemClock, now_millis};
use tokio::{
    net::{TcpListener, TcpStream, UdpSocket},
    sync::oneshot,
    time::timeout,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const WAIT: Duration = Duration::from_secs(3);

/// Helper struct to manage an in-process server and a fake downstream engine
struct TestBridge {
    ws_url: String,
    health_url: String,
    engine: UdpSocket,
    _shutdown: oneshot::Sender<()>,
}

impl TestBridge {
    async fn start() -> Self {
        let engine = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let forwarder = UdpTapForwarder::bind(engine.local_addr().unwrap())
            .await
            .unwrap();

        let repository = Arc::new(InMemoryParticipantRepository::new());
        let message_pusher = Arc::new(WebSocketMessagePusher::default());
        let server = Server::new(
            Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            Arc::new(RenameParticipantUseCase::new(
                repository.clone(),
                message_pusher.clone(),
            )),
            Arc::new(SendTapUseCase::new(
                repository,
                message_pusher,
                Arc::new(forwarder),
                Arc::new(SystemClock),
            )),
        );

        let ws_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let health_listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let ws_url = format!("ws://{}", ws_listener.local_addr().unwrap());
        let health_url = format!("http://{}", health_listener.local_addr().unwrap());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(server.serve(ws_listener, health_listener, async move {
            let _ = shutdown_rx.await;
        }));

        TestBridge {
            ws_url,
            health_url,
            engine,
            _shutdown: shutdown_tx,
        }
    }

    async fn connect(&self) -> Client {
        self.connect_at("/ws").await
    }

    async fn connect_at(&self, path: &str) -> Client {
        let url = format!("{}{}", self.ws_url, path);
        let (client, _response) = timeout(WAIT, connect_async(url.as_str()))
            .await
            .expect("timed out connecting")
            .expect("failed to connect");
        client
    }

    /// Receive the next datagram delivered to the fake engine
    async fn recv_datagram(&self) -> String {
        let mut buf = [0u8; 512];
        let (len, _) = timeout(WAIT, self.engine.recv_from(&mut buf))
            .await
            .expect("timed out waiting for datagram")
            .unwrap();
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    async fn assert_no_datagram(&self) {
        let mut buf = [0u8; 512];
        let result = timeout(Duration::from_millis(200), self.engine.recv_from(&mut buf)).await;
        assert!(result.is_err(), "unexpected extra datagram");
    }
}

async fn recv(client: &mut Client) -> ServerMessage {
    loop {
        let msg = timeout(WAIT, client.next())
            .await
            .expect("timed out waiting for message")
            .expect("connection ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).expect("server message should decode");
        }
    }
}

async fn send(client: &mut Client, value: serde_json::Value) {
    client
        .send(Message::Text(value.to_string().into()))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_two_participants_scenario() {
    // テスト項目: 接続 → タップ → 切断の一連の流れ
    // given (前提条件):
    let bridge = TestBridge::start().await;

    // when (操作) / then (期待する結果): C1 が接続すると welcome と参加者数 1 が届く
    let mut c1 = bridge.connect().await;
    assert_eq!(
        recv(&mut c1).await,
        ServerMessage::Welcome {
            id: 1,
            name: "Participant 1".to_string(),
            participant_count: 1,
        }
    );
    assert_eq!(recv(&mut c1).await, ServerMessage::ParticipantCount { count: 1 });

    // C2 が接続すると両方に参加者数 2 が届く
    let mut c2 = bridge.connect().await;
    assert_eq!(
        recv(&mut c2).await,
        ServerMessage::Welcome {
            id: 2,
            name: "Participant 2".to_string(),
            participant_count: 2,
        }
    );
    assert_eq!(recv(&mut c2).await, ServerMessage::ParticipantCount { count: 2 });
    assert_eq!(recv(&mut c1).await, ServerMessage::ParticipantCount { count: 2 });

    // C1 のタップは下流に 1 回だけ届き、送信者を含む両方にブロードキャストされる
    let sent_at = now_millis();
    send(&mut c1, json!({"type": "tap", "key": "a"})).await;
    assert_eq!(bridge.recv_datagram().await, "tap 1 a");
    for client in [&mut c1, &mut c2] {
        match recv(client).await {
            ServerMessage::Tap {
                id,
                name,
                key,
                timestamp,
            } => {
                assert_eq!(id, 1);
                assert_eq!(name, "Participant 1");
                assert_eq!(key, json!("a"));
                assert!(timestamp >= sent_at);
            }
            other => panic!("expected tap, got {:?}", other),
        }
    }
    bridge.assert_no_datagram().await;

    // C1 が切断すると C2 に参加者数 1 が届く
    c1.close(None).await.unwrap();
    assert_eq!(recv(&mut c2).await, ServerMessage::ParticipantCount { count: 1 });
}

#[tokio::test]
async fn test_malformed_frames_are_dropped_without_closing() {
    // テスト項目: 不正なフレームは捨てられ、接続は開いたまま
    // given (前提条件):
    let bridge = TestBridge::start().await;
    let mut client = bridge.connect().await;
    recv(&mut client).await; // welcome
    recv(&mut client).await; // participantCount

    // when (操作):
    client
        .send(Message::Text("not json".into()))
        .await
        .unwrap();
    send(&mut client, json!({"type": "tap"})).await;
    send(&mut client, json!({"type": "chat", "content": "hi"})).await;
    send(&mut client, json!({"type": "setName", "name": "Alice"})).await;

    // then (期待する結果): 改名の参加者数（変化なし）が次に届く
    assert_eq!(recv(&mut client).await, ServerMessage::ParticipantCount { count: 1 });
    bridge.assert_no_datagram().await;
}

#[tokio::test]
async fn test_rename_is_reflected_in_taps() {
    // テスト項目: 改名後のタップには新しい名前が載り、他の参加者の名前は変わらない
    // given (前提条件):
    let bridge = TestBridge::start().await;
    let mut alice = bridge.connect().await;
    recv(&mut alice).await; // welcome
    recv(&mut alice).await; // participantCount 1
    let mut bob = bridge.connect().await;
    recv(&mut bob).await; // welcome
    recv(&mut bob).await; // participantCount 2
    recv(&mut alice).await; // participantCount 2

    // when (操作):
    send(&mut alice, json!({"type": "setName", "name": "Alice"})).await;
    assert_eq!(recv(&mut bob).await, ServerMessage::ParticipantCount { count: 2 });
    assert_eq!(recv(&mut alice).await, ServerMessage::ParticipantCount { count: 2 });
    alice
        .send(Message::Binary(
            json!({"type": "tap", "key": 7}).to_string().into_bytes().into(),
        ))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(bridge.recv_datagram().await, "tap 1 7");
    assert!(matches!(
        recv(&mut bob).await,
        ServerMessage::Tap { id: 1, ref name, .. } if name == "Alice"
    ));

    send(&mut bob, json!({"type": "tap", "key": "b"})).await;
    assert_eq!(bridge.recv_datagram().await, "tap 2 b");
    assert!(matches!(
        recv(&mut bob).await,
        ServerMessage::Tap { id: 2, ref name, .. } if name == "Participant 2"
    ));
}

#[tokio::test]
async fn test_ids_are_not_reused_after_disconnect() {
    // テスト項目: 切断後の接続には新しい ID が割り当てられる
    // given (前提条件):
    let bridge = TestBridge::start().await;
    let mut watcher = bridge.connect().await;
    recv(&mut watcher).await; // welcome
    recv(&mut watcher).await; // participantCount 1
    let mut leaving = bridge.connect().await;
    recv(&mut leaving).await; // welcome
    assert_eq!(recv(&mut watcher).await, ServerMessage::ParticipantCount { count: 2 });

    // when (操作): 切断フレームを送らずに接続を落とす
    drop(leaving);
    assert_eq!(recv(&mut watcher).await, ServerMessage::ParticipantCount { count: 1 });
    let mut newcomer = bridge.connect().await;

    // then (期待する結果):
    assert_eq!(
        recv(&mut newcomer).await,
        ServerMessage::Welcome {
            id: 3,
            name: "Participant 3".to_string(),
            participant_count: 2,
        }
    );
}

#[tokio::test]
async fn test_upgrade_is_accepted_on_any_path() {
    // テスト項目: どのパスでも WebSocket 接続を受け付ける
    // given (前提条件):
    let bridge = TestBridge::start().await;

    // when (操作):
    let mut root = bridge.connect_at("/").await;
    let mut other = bridge.connect_at("/tap/room").await;

    // then (期待する結果):
    assert!(matches!(recv(&mut root).await, ServerMessage::Welcome { id: 1, .. }));
    assert!(matches!(recv(&mut other).await, ServerMessage::Welcome { id: 2, .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_connections_are_handled_one_at_a_time() {
    // テスト項目: 複数の接続から同時に届くイベントが 1 つずつ処理される
    // given (前提条件):
    const N: usize = 10;
    const TAPPERS: usize = 5;
    let bridge = TestBridge::start().await;
    let mut watcher = bridge.connect().await;
    recv(&mut watcher).await; // welcome
    assert_eq!(recv(&mut watcher).await, ServerMessage::ParticipantCount { count: 1 });

    // when (操作): N 個のクライアントが同時に接続する
    let clients = join_all((0..N).map(|_| bridge.connect())).await;

    // then (期待する結果): ID は重複せず 2..=N+1、各クライアントの参加者数は
    // welcome の値から N+1 まで 1 ずつ増える
    let mut joined = Vec::new();
    for mut client in clients {
        let (id, count) = match recv(&mut client).await {
            ServerMessage::Welcome {
                id,
                participant_count,
                ..
            } => (id, participant_count),
            other => panic!("expected welcome, got {:?}", other),
        };
        for expected in count..=N + 1 {
            assert_eq!(
                recv(&mut client).await,
                ServerMessage::ParticipantCount { count: expected }
            );
        }
        joined.push((id, client));
    }
    let mut ids: Vec<u64> = joined.iter().map(|(id, _)| *id).collect();
    ids.sort_unstable();
    assert_eq!(ids, (2..=N as u64 + 1).collect::<Vec<_>>());
    for expected in 2..=N + 1 {
        assert_eq!(
            recv(&mut watcher).await,
            ServerMessage::ParticipantCount { count: expected }
        );
    }

    // when (操作): 複数のクライアントが同時にタップする
    join_all(
        joined
            .iter_mut()
            .take(TAPPERS)
            .map(|(id, client)| send(client, json!({"type": "tap", "key": format!("k{}", id)}))),
    )
    .await;

    // then (期待する結果): タップごとに 1 つのデータグラムが届き、全員が同じ順序でタップを受け取る
    let mut datagrams = Vec::new();
    for _ in 0..TAPPERS {
        datagrams.push(bridge.recv_datagram().await);
    }
    bridge.assert_no_datagram().await;
    datagrams.sort();
    let mut expected_datagrams: Vec<String> = joined
        .iter()
        .take(TAPPERS)
        .map(|(id, _)| format!("tap {} k{}", id, id))
        .collect();
    expected_datagrams.sort();
    assert_eq!(datagrams, expected_datagrams);

    let mut tap_order = Vec::new();
    for _ in 0..TAPPERS {
        match recv(&mut watcher).await {
            ServerMessage::Tap { id, .. } => tap_order.push(id),
            other => panic!("expected tap, got {:?}", other),
        }
    }
    for (_, client) in joined.iter_mut() {
        for expected in &tap_order {
            assert!(matches!(
                recv(client).await,
                ServerMessage::Tap { id, .. } if id == *expected
            ));
        }
    }

    // when (操作): 全クライアントが同時に切断する
    join_all(joined.iter_mut().map(|(_, client)| client.close(None))).await;

    // then (期待する結果): 監視側の参加者数は N から 1 まで 1 ずつ減る
    for expected in (1..=N).rev() {
        assert_eq!(
            recv(&mut watcher).await,
            ServerMessage::ParticipantCount { count: expected }
        );
    }
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックがどのパスでも 200 と固定の本文を返す
    // given (前提条件):
    let bridge = TestBridge::start().await;

    // when (操作):
    let root = reqwest::get(format!("{}/", bridge.health_url)).await.unwrap();
    let other = reqwest::get(format!("{}/healthz", bridge.health_url))
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(root.status(), reqwest::StatusCode::OK);
    assert_eq!(root.text().await.unwrap(), "Max MSP Tap Bridge OK\n");
    assert_eq!(other.status(), reqwest::StatusCode::OK);
}

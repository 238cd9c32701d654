//! End-to-end tests against a live server on an ephemeral port
//!
//! Uses the in-memory adapters; no external services are needed.

mod common;

use std::time::Duration;

use common::{eventually, token_for, TestServer};
use futures::{SinkExt, StreamExt};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::{client::IntoClientRequest, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn open(server: &TestServer, user: &str) -> Ws {
    let (ws, _) = connect_async(server.ws_url(&token_for(user)))
        .await
        .expect("websocket connect");
    ws
}

async fn send(ws: &mut Ws, frame: Value) {
    ws.send(Message::Text(frame.to_string())).await.expect("send");
}

/// Next JSON text frame, skipping control frames
async fn next_event(ws: &mut Ws) -> Value {
    loop {
        let msg = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for frame")
            .expect("stream ended")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).expect("JSON frame");
        }
    }
}

#[tokio::test]
async fn health_endpoint() {
    let server = TestServer::start().await;

    let response = server
        .client
        .get(server.http_url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "chat-server");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn upgrade_without_valid_token_is_rejected() {
    let server = TestServer::start().await;

    for url in [
        format!("ws://{}/ws", server.addr),
        format!("ws://{}/ws?token=garbage", server.addr),
    ] {
        match connect_async(url).await {
            Err(tokio_tungstenite::tungstenite::Error::Http(response)) => {
                assert_eq!(response.status(), 401);
            }
            Err(e) => panic!("expected 401, got {e}"),
            Ok(_) => panic!("upgrade should have been rejected"),
        }
    }
    assert_eq!(server.hub.session_count(), 0);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn bearer_header_is_accepted_on_upgrade() {
    let server = TestServer::start().await;

    let mut request = format!("ws://{}/ws", server.addr)
        .into_client_request()
        .unwrap();
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {}", token_for("alice")).parse().unwrap(),
    );
    let (_ws, _) = connect_async(request).await.expect("connect");

    let hub = server.hub.clone();
    assert!(eventually(|| hub.session_for("alice").is_some()).await);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn chat_round_trip() {
    let server = TestServer::start().await;
    let alice_token = token_for("alice");
    let bob_token = token_for("bob");

    // Alice creates a room with Bob over REST
    let response = server
        .client
        .post(server.http_url("/rooms"))
        .bearer_auth(&alice_token)
        .json(&json!({"name": "pair", "kind": "group", "memberIds": ["bob"]}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let room: Value = response.json().await.unwrap();
    let room_id = room["id"].as_str().unwrap().to_string();

    let mut alice = open(&server, "alice").await;
    let mut bob = open(&server, "bob").await;

    for ws in [&mut alice, &mut bob] {
        send(ws, json!({"type": "join_room", "payload": {"roomId": room_id}})).await;
    }
    let hub = server.hub.clone();
    let joined_room = room_id.clone();
    assert!(eventually(|| hub.room_members(&joined_room).len() == 2).await);

    // Socket-originated message reaches both members
    send(
        &mut alice,
        json!({"type": "send_message", "payload": {"roomId": room_id, "content": "hi"}}),
    )
    .await;
    for ws in [&mut alice, &mut bob] {
        let event = next_event(ws).await;
        assert_eq!(event["type"], "new_message");
        assert_eq!(event["payload"]["content"], "hi");
        assert_eq!(event["payload"]["senderId"], "alice");
    }

    // Typing reaches everyone but the typist
    send(
        &mut bob,
        json!({"type": "typing", "payload": {"roomId": room_id, "isTyping": true}}),
    )
    .await;
    let event = next_event(&mut alice).await;
    assert_eq!(event["type"], "user_typing");
    assert_eq!(event["payload"]["userId"], "bob");

    let typing: Value = server
        .client
        .get(server.http_url(&format!("/rooms/{room_id}/typing")))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(typing["userIds"], json!(["bob"]));

    // REST-originated message is pushed to live sessions
    let response = server
        .client
        .post(server.http_url("/messages"))
        .bearer_auth(&bob_token)
        .json(&json!({"roomId": room_id, "content": "from rest", "kind": "text"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = next_event(&mut alice).await;
    assert_eq!(event["payload"]["content"], "from rest");
    assert_eq!(event["payload"]["senderId"], "bob");

    // History, oldest first
    let history: Vec<Value> = server
        .client
        .get(server.http_url(&format!("/rooms/{room_id}/messages?limit=10")))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let contents: Vec<_> = history.iter().map(|m| m["content"].clone()).collect();
    assert_eq!(contents, vec![json!("hi"), json!("from rest")]);

    // Rooms listing and presence
    let rooms: Vec<Value> = server
        .client
        .get(server.http_url("/rooms"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms.len(), 1);

    let presence: Value = server
        .client
        .get(server.http_url("/users/alice/presence"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(presence, json!({"userId": "alice", "online": true}));

    // Alice disconnects: her session and online marker go away
    alice.close(None).await.unwrap();
    assert!(eventually(|| hub.session_for("alice").is_none()).await);
    let presence: Value = server
        .client
        .get(server.http_url("/users/alice/presence"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(presence["online"], false);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn shutdown_closes_open_sockets() {
    let server = TestServer::start().await;
    let mut ws = open(&server, "alice").await;
    let hub = server.hub.clone();
    assert!(eventually(|| hub.session_count() == 1).await);

    server.stop().await.unwrap();

    // The socket ends with a close frame or end of stream
    let ended = timeout(Duration::from_secs(5), async {
        while let Some(msg) = ws.next().await {
            match msg {
                Ok(Message::Close(_)) | Err(_) => break,
                Ok(_) => {}
            }
        }
    })
    .await;
    assert!(ended.is_ok());
    assert_eq!(hub.session_count(), 0);
}

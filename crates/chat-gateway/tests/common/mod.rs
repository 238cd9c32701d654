//! Shared helpers for gateway integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chat_common::{AppConfig, JwtService};
use chat_core::{NewRoom, RoomKind};
use chat_gateway::{create_app, create_gateway_state, run_server, GatewayState, Hub, Session};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Configuration with in-memory adapters and the given overrides
pub fn test_config(overrides: &[(&str, &str)]) -> AppConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("JWT_SECRET".to_string(), TEST_SECRET.to_string()),
        ("SHUTDOWN_GRACE_SECS".to_string(), "2".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }
    AppConfig::from_lookup(|key| vars.get(key).cloned()).expect("test config")
}

pub async fn test_state() -> GatewayState {
    create_gateway_state(&test_config(&[]))
        .await
        .expect("gateway state")
}

pub fn token_for(user_id: &str) -> String {
    JwtService::new(TEST_SECRET, 900)
        .issue_access_token(user_id)
        .expect("token")
}

/// Create a group room directly through the repository
pub async fn create_room(state: &GatewayState, creator: &str, members: &[&str]) -> Uuid {
    let mut member_ids: Vec<String> = vec![creator.to_string()];
    member_ids.extend(members.iter().map(ToString::to_string));
    state
        .service_context()
        .room_repo()
        .create(
            NewRoom {
                name: "test room".to_string(),
                kind: RoomKind::Group,
                created_by: creator.to_string(),
            },
            &member_ids,
        )
        .await
        .expect("room")
        .id
}

/// Register a session with the hub and hand back its outbound queue
pub async fn connect(
    hub: &Hub,
    user_id: &str,
    capacity: usize,
) -> (Arc<Session>, mpsc::Receiver<chat_gateway::Frame>) {
    let (session, rx) = Session::new(user_id, capacity);
    hub.register(Arc::clone(&session)).await;
    (session, rx)
}

/// Drain every frame currently queued, decoded as JSON
pub fn drain(rx: &mut mpsc::Receiver<chat_gateway::Frame>) -> Vec<serde_json::Value> {
    let mut frames = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        frames.push(serde_json::from_str(&frame).expect("frame is JSON"));
    }
    frames
}

/// Poll `check` until it holds or the timeout passes
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

/// A gateway bound to an ephemeral port
pub struct TestServer {
    pub addr: SocketAddr,
    pub hub: Arc<Hub>,
    pub state: GatewayState,
    pub client: reqwest::Client,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), chat_common::AppError>>,
}

impl TestServer {
    pub async fn start() -> Self {
        let config = test_config(&[]);
        let state = create_gateway_state(&config).await.expect("state");
        let hub = state.hub_handle();
        let app = create_app(state.clone(), &config);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(run_server(
            listener,
            app,
            Arc::clone(&hub),
            config.server.shutdown_grace,
            async move {
                let _ = rx.await;
            },
        ));

        Self {
            addr,
            hub,
            state,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("client"),
            shutdown: Some(tx),
            handle,
        }
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self, token: &str) -> String {
        format!("ws://{}/ws?token={}", self.addr, token)
    }

    /// Trigger graceful shutdown and wait for the server task
    pub async fn stop(mut self) -> Result<(), chat_common::AppError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        tokio::time::timeout(Duration::from_secs(10), self.handle)
            .await
            .expect("server stopped in time")
            .expect("server task")
    }
}

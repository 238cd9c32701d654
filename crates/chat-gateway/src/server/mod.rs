//! Gateway server setup
//!
//! Builds the axum application (WebSocket endpoint plus REST routes), wires
//! the storage adapters and runs the server with graceful shutdown.

mod connection;
mod handler;
mod middleware;
mod state;

pub use connection::serve_connection;
pub use handler::{gateway_handler, ConnectParams};
pub use middleware::{apply_middleware, REQUEST_ID_HEADER};
pub use state::GatewayState;

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use chat_cache::{InMemoryPresenceStore, PresenceStore, RedisPool};
use chat_common::{AppConfig, AppError, JwtService};
use chat_core::{MessageRepository, PresenceRepository, RoomRepository};
use chat_db::{InMemoryMessageRepository, InMemoryRoomRepository, PgMessageRepository, PgRoomRepository};
use chat_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::api;
use crate::hub::Hub;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws", get(gateway_handler))
        .merge(api::routes())
}

/// Build the complete application
pub fn create_app(state: GatewayState, config: &AppConfig) -> Router {
    let router = create_router().with_state(state);
    apply_middleware(router, &config.cors, config.app.env.is_production())
}

/// Initialize all dependencies and create `GatewayState`
///
/// PostgreSQL and Redis are used when configured; otherwise the in-memory
/// adapters stand in.
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    let (message_repo, room_repo): (Arc<dyn MessageRepository>, Arc<dyn RoomRepository>) =
        if let Some(database) = &config.database {
            tracing::info!("Connecting to PostgreSQL...");
            let pool = chat_db::create_pool(&chat_db::DatabaseConfig::from(database))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            chat_db::ensure_schema(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            tracing::info!("PostgreSQL connection established");
            (
                Arc::new(PgMessageRepository::new(pool.clone())),
                Arc::new(PgRoomRepository::new(pool)),
            )
        } else {
            tracing::warn!("DATABASE_URL not set, messages and rooms are kept in memory");
            (
                Arc::new(InMemoryMessageRepository::new()),
                Arc::new(InMemoryRoomRepository::new()),
            )
        };

    let presence: Arc<dyn PresenceRepository> = if let Some(redis) = &config.redis {
        tracing::info!("Connecting to Redis...");
        let pool = RedisPool::from_config(redis).map_err(|e| AppError::Cache(e.to_string()))?;
        if let Err(e) = pool.health_check().await {
            tracing::warn!(error = %e, "Redis not reachable yet, presence writes will be retried per call");
        }
        Arc::new(PresenceStore::new(pool))
    } else {
        tracing::warn!("REDIS_URL not set, presence is kept in memory");
        Arc::new(InMemoryPresenceStore::new())
    };

    let service_context = ServiceContextBuilder::new()
        .message_repo(message_repo)
        .room_repo(room_repo)
        .presence(presence)
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry);

    Ok(GatewayState::new(
        service_context,
        jwt_service,
        config.hub,
        config.app.name.as_str(),
    ))
}

/// Serve until `signal` resolves, then shut the hub down
///
/// Closing every session ends the open sockets. After the signal the server
/// gets at most `grace` to finish in-flight work.
pub async fn run_server<F>(
    listener: TcpListener,
    app: Router,
    hub: Arc<Hub>,
    grace: Duration,
    signal: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let notify = Arc::clone(&draining);

    let shutdown = async move {
        signal.await;
        tracing::info!("Shutdown signal received, closing sessions");
        hub.shutdown().await;
        notify.notify_one();
    };

    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .into_future();

    tokio::select! {
        result = serve => {
            result.map_err(|e| AppError::Config(format!("Server error: {e}")))?;
        }
        () = async {
            draining.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            tracing::warn!(grace_secs = grace.as_secs(), "Grace period elapsed, exiting");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let state = create_gateway_state(&config).await?;
    let hub = state.hub_handle();
    let app = create_app(state, &config);

    let addr = config.server.address();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!(
        address = %addr,
        "Gateway listening (ws://{addr}/ws)"
    );

    run_server(listener, app, hub, config.server.shutdown_grace, shutdown_signal()).await
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

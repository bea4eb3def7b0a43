use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::handlers::{
    create_task, delete_task, get_task, health, list_tasks, replication_status, snapshot,
    sync_task, update_task, AppState,
};
use crate::middleware::normalize_content_type;
use tasksync::TaskStore;
use tasksync_replication::{NodeConfig, ReplicationManager};

/// Install the global tracing subscriber. `RUST_LOG` overrides the default
/// `info` filter. Calling it twice is harmless.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Full application router: REST front-end plus internal replication routes.
pub fn router(state: Arc<AppState>) -> Router {
    let tasks = Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(state.clone());

    // Peer-to-peer replication endpoints
    let internal = Router::new()
        .route("/internal/sync", post(sync_task))
        .route("/internal/snapshot", get(snapshot))
        .route("/internal/status", get(replication_status))
        .with_state(state.clone());

    let health_route = Router::new()
        .route("/health", get(health))
        .with_state(state);

    Router::new()
        .merge(health_route)
        .merge(tasks)
        .merge(internal)
        .layer(middleware::from_fn(normalize_content_type))
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(node_config: NodeConfig) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let bind_addr = node_config.bind_addr.clone();
    let node_id = node_config.node_id.clone();
    let catch_up_on_start = node_config.catch_up_on_start;

    let replication_manager = if !node_config.peers.is_empty() {
        tracing::info!(
            "Replication enabled: {} peers, {}ms sync timeout",
            node_config.peers.len(),
            node_config.sync_timeout_ms
        );
        Some(ReplicationManager::new(node_config))
    } else {
        tracing::info!("Replication disabled (no peers configured)");
        None
    };

    let store = Arc::new(TaskStore::new());
    let state = Arc::new(AppState::new(
        node_id.clone(),
        store,
        replication_manager.clone(),
    ));

    if let (Some(repl), true) = (replication_manager, catch_up_on_start) {
        let receiver = state.receiver.clone();
        tokio::spawn(async move {
            if let Err(e) = repl.catch_up(&receiver).await {
                tracing::warn!("[SYNC] start-up catch-up skipped: {}", e);
            }
        });
    }

    let app = router(state);

    tracing::info!("Starting tasksync node {} on {}", node_id, bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

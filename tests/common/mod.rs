#![allow(dead_code)]

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tasksync::TaskStore;
use tasksync_http::{router, AppState};
use tasksync_replication::{NodeConfig, PeerConfig, ReplicationManager};
use tokio::net::TcpListener;

/// In-process node without peers, for `oneshot` router tests.
pub fn standalone_app(node_id: &str) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(node_id, Arc::new(TaskStore::new()), None));
    (router(state.clone()), state)
}

/// Reserve a loopback port so peers can be wired before any node starts.
pub async fn bind_node() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    (listener, addr)
}

/// Serve a node on an already bound listener, replicating to `peers`.
pub fn start_node(listener: TcpListener, node_id: &str, peers: &[&str]) -> Arc<AppState> {
    let node_config = NodeConfig {
        node_id: node_id.to_string(),
        bind_addr: listener.local_addr().unwrap().to_string(),
        peers: peers
            .iter()
            .map(|p| PeerConfig::parse(p).unwrap())
            .collect(),
        sync_timeout_ms: 1_000,
        catch_up_on_start: false,
    };

    let manager = if node_config.peers.is_empty() {
        None
    } else {
        Some(ReplicationManager::new(node_config))
    };
    let state = Arc::new(AppState::new(
        node_id,
        Arc::new(TaskStore::new()),
        manager,
    ));

    let app = router(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    state
}

/// Poll `check` until it holds or the deadline passes.
pub async fn eventually<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    check()
}

pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

use axum::{extract::State, Json};
use std::sync::Arc;

use super::AppState;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "node_id": state.receiver.node_id(),
        "tasks": state.store.len(),
        "peers": state
            .replication_manager
            .as_ref()
            .map(|m| m.peer_count())
            .unwrap_or(0),
        "build_profile": if cfg!(debug_assertions) { "debug" } else { "release" },
    }))
}

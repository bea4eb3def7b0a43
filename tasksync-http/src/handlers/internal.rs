use crate::handlers::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use tasksync_replication::types::{ReplicationStatus, SnapshotResponse};
use tasksync_replication::{SyncTaskRequest, SyncTaskResponse};

/// POST /internal/sync
/// Receive one record (or deletion) from a peer and merge it last-write-wins.
/// Always acknowledges; stale and empty requests are no-ops.
pub async fn sync_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SyncTaskRequest>,
) -> Json<SyncTaskResponse> {
    Json(state.receiver.sync_task(req))
}

/// GET /internal/snapshot
/// Every record and tombstone on this node, for peer catch-up
pub async fn snapshot(State(state): State<Arc<AppState>>) -> Json<SnapshotResponse> {
    let snapshot = state.receiver.snapshot();
    tracing::info!(
        "[SYNC] serving snapshot: {} tasks, {} tombstones",
        snapshot.tasks.len(),
        snapshot.tombstones.len()
    );
    Json(snapshot)
}

/// GET /internal/status
/// Return basic replication status for monitoring
pub async fn replication_status(State(state): State<Arc<AppState>>) -> Json<ReplicationStatus> {
    let status = match &state.replication_manager {
        Some(repl_mgr) => repl_mgr.status(&state.store),
        None => ReplicationStatus {
            node_id: state.receiver.node_id().to_string(),
            replication_enabled: false,
            peer_count: 0,
            task_count: state.store.len(),
            tombstone_count: state.store.tombstone_count(),
            peers: vec![],
        },
    };

    Json(status)
}

use super::types::{SnapshotResponse, SyncTaskRequest, SyncTaskResponse};
use std::sync::Arc;
use tasksync::{MergeOutcome, TaskStore};

/// What a sync request did to the local store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied(MergeOutcome),
    Ignored(MergeOutcome),
    /// Request carried neither a task nor a tombstone
    Malformed,
}

/// Receiving side of replication: merges records pushed by peers into the
/// local store under last-write-wins.
#[derive(Clone)]
pub struct ReplicationServer {
    node_id: String,
    store: Arc<TaskStore>,
}

impl ReplicationServer {
    pub fn new(node_id: impl Into<String>, store: Arc<TaskStore>) -> Self {
        Self {
            node_id: node_id.into(),
            store,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn store(&self) -> &Arc<TaskStore> {
        &self.store
    }

    /// Handle one incoming sync call. Never fails: every request is
    /// acknowledged, including ones that change nothing.
    pub fn sync_task(&self, req: SyncTaskRequest) -> SyncTaskResponse {
        self.apply(req);
        SyncTaskResponse {}
    }

    /// Merge one request and report what happened.
    pub fn apply(&self, req: SyncTaskRequest) -> SyncOutcome {
        let origin = req.origin_node.as_deref().unwrap_or("unknown");

        // A request may carry both; the record is merged first so a
        // same-timestamp tombstone still wins.
        let mut outcome = SyncOutcome::Malformed;

        if let Some(task) = req.task {
            let id = task.id.clone();
            tracing::info!("[SYNC {}] received record from {}", id, origin);
            outcome = self.classify(&id, self.store.merge(task));
        }

        if let Some(tombstone) = req.tombstone {
            let id = tombstone.id.clone();
            tracing::info!("[SYNC {}] received deletion from {}", id, origin);
            outcome = self.classify(&id, self.store.merge_tombstone(tombstone));
        }

        if outcome == SyncOutcome::Malformed {
            tracing::warn!(
                "[SYNC] empty sync request from {}, acknowledging as no-op",
                origin
            );
        }

        outcome
    }

    fn classify(&self, id: &str, merge: MergeOutcome) -> SyncOutcome {
        match &merge {
            MergeOutcome::IgnoredLocalNewer { local, incoming } => {
                tracing::info!(
                    "[SYNC {}] ignoring sync; local version is newer (local={}, incoming={})",
                    id,
                    local,
                    incoming
                );
            }
            MergeOutcome::IgnoredDeleted { deleted_at } => {
                tracing::info!(
                    "[SYNC {}] ignoring sync; task was deleted at {}",
                    id,
                    deleted_at
                );
            }
            MergeOutcome::Deleted | MergeOutcome::TombstoneRecorded => {
                tracing::info!("[SYNC {}] synced deletion successfully", id);
            }
            MergeOutcome::Inserted | MergeOutcome::Replaced => {
                tracing::info!("[SYNC {}] synced task successfully", id);
            }
        }

        if merge.changed_state() {
            SyncOutcome::Applied(merge)
        } else {
            SyncOutcome::Ignored(merge)
        }
    }

    pub fn snapshot(&self) -> SnapshotResponse {
        let snapshot = self.store.snapshot();
        SnapshotResponse {
            node_id: self.node_id.clone(),
            tasks: snapshot.tasks,
            tombstones: snapshot.tombstones,
        }
    }

    /// Merge a peer's full snapshot. Returns how many entries changed local state.
    pub fn merge_snapshot(&self, snapshot: SnapshotResponse) -> usize {
        let mut changed = 0;
        for task in snapshot.tasks {
            if self.store.merge(task).changed_state() {
                changed += 1;
            }
        }
        for tombstone in snapshot.tombstones {
            if self.store.merge_tombstone(tombstone).changed_state() {
                changed += 1;
            }
        }
        changed
    }
}

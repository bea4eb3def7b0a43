use serde::{Deserialize, Serialize};
use tasksync::{Task, TaskId, Tombstone};

/// A local mutation to propagate to peers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Upsert(Task),
    Delete(Tombstone),
}

impl Change {
    pub fn task_id(&self) -> &TaskId {
        match self {
            Change::Upsert(task) => &task.id,
            Change::Delete(tombstone) => &tombstone.id,
        }
    }

    pub fn into_request(self, origin_node: &str) -> SyncTaskRequest {
        let (task, tombstone) = match self {
            Change::Upsert(task) => (Some(task), None),
            Change::Delete(tombstone) => (None, Some(tombstone)),
        };
        SyncTaskRequest {
            origin_node: Some(origin_node.to_string()),
            task,
            tombstone,
        }
    }
}

/// Body of `POST /internal/sync`: one task record (or one deletion) pushed by a peer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_node: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tombstone: Option<Tombstone>,
}

/// Empty acknowledgement returned for every sync request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncTaskResponse {}

/// Response of `GET /internal/snapshot`, used for catch-up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub node_id: String,
    pub tasks: Vec<Task>,
    pub tombstones: Vec<Tombstone>,
}

/// Per-peer delivery counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeerStatus {
    pub node_id: String,
    pub addr: String,
    pub delivered: u64,
    pub failed: u64,
    pub last_success: u64, // Unix timestamp in seconds, 0 = never
}

/// Basic replication status for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationStatus {
    pub node_id: String,
    pub replication_enabled: bool,
    pub peer_count: usize,
    pub task_count: usize,
    pub tombstone_count: usize,
    pub peers: Vec<PeerStatus>,
}

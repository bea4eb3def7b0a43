use std::sync::Arc;
use tasksync::TaskStore;
use tasksync_replication::{Change, ReplicationManager, ReplicationServer};

pub mod health;
pub mod internal;
pub mod tasks;

pub struct AppState {
    pub store: Arc<TaskStore>,
    pub receiver: ReplicationServer,
    pub replication_manager: Option<Arc<ReplicationManager>>,
}

impl AppState {
    pub fn new(
        node_id: impl Into<String>,
        store: Arc<TaskStore>,
        replication_manager: Option<Arc<ReplicationManager>>,
    ) -> Self {
        Self {
            receiver: ReplicationServer::new(node_id, Arc::clone(&store)),
            store,
            replication_manager,
        }
    }

    /// Hand a local change to the broadcaster without waiting for delivery.
    pub(crate) fn replicate(&self, change: Change) {
        if let Some(manager) = &self.replication_manager {
            // Dropping the handle detaches the per-peer deliveries.
            let _ = manager.broadcast(change);
        }
    }
}

pub use health::health;
pub use internal::{replication_status, snapshot, sync_task};
pub use tasks::{create_task, delete_task, get_task, list_tasks, update_task};

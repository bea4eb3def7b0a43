use super::config::NodeConfig;
use super::error::ReplicationError;
use super::peer::PeerClient;
use super::receiver::ReplicationServer;
use super::types::{Change, ReplicationStatus};
use std::sync::Arc;
use tasksync::TaskStore;
use tokio::task::JoinHandle;

/// Orchestrates fan-out of local changes to all peers
pub struct ReplicationManager {
    node_config: NodeConfig,
    peers: Vec<Arc<PeerClient>>,
}

/// In-flight deliveries of one change, one task per peer.
///
/// Dropping it detaches the deliveries; they still run to completion (or
/// timeout). Joining is only useful for logging and tests.
pub struct Broadcast {
    deliveries: Vec<(String, JoinHandle<Result<(), ReplicationError>>)>,
}

impl Broadcast {
    pub fn len(&self) -> usize {
        self.deliveries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Wait for every delivery and return per-peer results in peer order
    pub async fn join(self) -> Vec<(String, Result<(), ReplicationError>)> {
        let mut results = Vec::with_capacity(self.deliveries.len());
        for (peer_id, handle) in self.deliveries {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ReplicationError::DeliveryAborted {
                    peer: peer_id.clone(),
                    reason: e.to_string(),
                }),
            };
            results.push((peer_id, result));
        }
        results
    }
}

impl ReplicationManager {
    pub fn new(node_config: NodeConfig) -> Arc<Self> {
        let timeout = node_config.sync_timeout();
        let peers: Vec<Arc<PeerClient>> = node_config
            .peers
            .iter()
            .map(|peer_config| {
                Arc::new(PeerClient::new(
                    peer_config.node_id.clone(),
                    peer_config.addr.clone(),
                    timeout,
                ))
            })
            .collect();

        Arc::new(Self { node_config, peers })
    }

    pub fn node_id(&self) -> &str {
        &self.node_config.node_id
    }

    pub fn peer_count(&self) -> usize {
        self.peers.len()
    }

    /// Send a change to every peer (fire-and-forget).
    /// Spawns one task per peer and returns without waiting for any of them;
    /// a slow or dead peer never delays the others. Must be called from
    /// within a tokio runtime.
    pub fn broadcast(&self, change: Change) -> Broadcast {
        let task_id = change.task_id().clone();
        let req = Arc::new(change.into_request(self.node_id()));

        let deliveries = self
            .peers
            .iter()
            .map(|peer| {
                let peer = Arc::clone(peer);
                let req = Arc::clone(&req);
                let task_id = task_id.clone();

                let peer_id = peer.peer_id().to_string();
                let handle = tokio::spawn(async move {
                    tracing::debug!("[SYNC {}] sending to peer {}", task_id, peer.peer_id());
                    match peer.sync_task(&req).await {
                        Ok(_) => {
                            tracing::info!(
                                "[SYNC {}] synced with peer {}",
                                task_id,
                                peer.peer_id()
                            );
                            Ok(())
                        }
                        Err(e) => {
                            // No retry: the next change to this task carries the full record.
                            tracing::warn!(
                                "[SYNC {}] failed to sync with peer {}: {}",
                                task_id,
                                peer.peer_id(),
                                e
                            );
                            Err(e)
                        }
                    }
                });

                (peer_id, handle)
            })
            .collect();

        Broadcast { deliveries }
    }

    /// Catch up from the first peer that answers with a snapshot.
    /// Returns how many local entries changed.
    pub async fn catch_up(&self, receiver: &ReplicationServer) -> Result<usize, ReplicationError> {
        let mut last_err = ReplicationError::NoPeers;

        for peer in &self.peers {
            match peer.fetch_snapshot().await {
                Ok(snapshot) => {
                    let tasks = snapshot.tasks.len();
                    let tombstones = snapshot.tombstones.len();
                    let changed = receiver.merge_snapshot(snapshot);
                    tracing::info!(
                        "[SYNC] caught up from peer {}: {} tasks, {} tombstones, {} applied",
                        peer.peer_id(),
                        tasks,
                        tombstones,
                        changed
                    );
                    return Ok(changed);
                }
                Err(e) => {
                    tracing::warn!("[SYNC] catch-up from peer {} failed: {}", peer.peer_id(), e);
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    pub fn status(&self, store: &TaskStore) -> ReplicationStatus {
        ReplicationStatus {
            node_id: self.node_id().to_string(),
            replication_enabled: !self.peers.is_empty(),
            peer_count: self.peers.len(),
            task_count: store.len(),
            tombstone_count: store.tombstone_count(),
            peers: self.peers.iter().map(|peer| peer.status()).collect(),
        }
    }
}

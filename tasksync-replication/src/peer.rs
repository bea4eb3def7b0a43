use super::error::ReplicationError;
use super::types::{PeerStatus, SnapshotResponse, SyncTaskRequest, SyncTaskResponse};
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// HTTP client wrapper for communicating with a single peer node
pub struct PeerClient {
    peer_id: String,
    base_url: String,
    timeout: Duration,
    http_client: reqwest::Client,
    delivered: AtomicU64,
    failed: AtomicU64,
    last_success: AtomicU64, // Unix timestamp in seconds
}

impl PeerClient {
    pub fn new(peer_id: String, base_url: String, timeout: Duration) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("[SYNC] falling back to default HTTP client for {}: {}", peer_id, e);
                reqwest::Client::new()
            });

        Self {
            peer_id,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http_client,
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            last_success: AtomicU64::new(0),
        }
    }

    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn last_success_timestamp(&self) -> u64 {
        self.last_success.load(Ordering::Relaxed)
    }

    pub fn status(&self) -> PeerStatus {
        PeerStatus {
            node_id: self.peer_id.clone(),
            addr: self.base_url.clone(),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            last_success: self.last_success_timestamp(),
        }
    }

    /// Push one record (or deletion) to this peer
    pub async fn sync_task(
        &self,
        req: &SyncTaskRequest,
    ) -> Result<SyncTaskResponse, ReplicationError> {
        let url = format!("{}/internal/sync", self.base_url);
        self.execute(self.http_client.post(&url).json(req)).await
    }

    /// Fetch every record and tombstone held by this peer
    pub async fn fetch_snapshot(&self) -> Result<SnapshotResponse, ReplicationError> {
        let url = format!("{}/internal/snapshot", self.base_url);
        self.execute(self.http_client.get(&url)).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ReplicationError> {
        let timeout_ms = self.timeout.as_millis() as u64;

        let call = async {
            let response = request
                .send()
                .await
                .map_err(|e| ReplicationError::from_send(&self.peer_id, timeout_ms, e))?;

            if !response.status().is_success() {
                return Err(ReplicationError::PeerRejected {
                    peer: self.peer_id.clone(),
                    status: response.status().as_u16(),
                });
            }

            response.json::<T>().await.map_err(|e| {
                if e.is_timeout() {
                    ReplicationError::PeerTimeout {
                        peer: self.peer_id.clone(),
                        timeout_ms,
                    }
                } else {
                    ReplicationError::InvalidResponse {
                        peer: self.peer_id.clone(),
                        reason: e.to_string(),
                    }
                }
            })
        };

        // reqwest enforces the same bound; this also covers a client built
        // without one.
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(ReplicationError::PeerTimeout {
                peer: self.peer_id.clone(),
                timeout_ms,
            }),
        };

        match result {
            Ok(_) => {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                self.last_success.store(now, Ordering::Relaxed);
                self.delivered.fetch_add(1, Ordering::Relaxed);
            }
            Err(_) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tasksync::{Task, TaskDraft};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request_for(task: Task) -> SyncTaskRequest {
        SyncTaskRequest {
            origin_node: Some("node-a".to_string()),
            task: Some(task),
            tombstone: None,
        }
    }

    #[test]
    fn test_peer_client_creation() {
        let peer = PeerClient::new(
            "test-peer".to_string(),
            "http://localhost:7700/".to_string(),
            Duration::from_secs(5),
        );

        assert_eq!(peer.peer_id(), "test-peer");
        assert_eq!(peer.base_url(), "http://localhost:7700");
        assert_eq!(peer.last_success_timestamp(), 0);
        assert_eq!(peer.status().delivered, 0);
    }

    #[tokio::test]
    async fn test_sync_task_posts_record() {
        let server = MockServer::start().await;
        let task = Task::from_draft(TaskDraft::default());

        Mock::given(method("POST"))
            .and(path("/internal/sync"))
            .and(body_partial_json(serde_json::json!({
                "origin_node": "node-a",
                "task": {"id": task.id.clone()}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let peer = PeerClient::new("b".to_string(), server.uri(), Duration::from_secs(5));
        let ack = peer.sync_task(&request_for(task)).await.unwrap();

        assert_eq!(ack, SyncTaskResponse {});
        assert_eq!(peer.status().delivered, 1);
        assert!(peer.last_success_timestamp() > 0);
    }

    #[tokio::test]
    async fn test_sync_task_non_success_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/internal/sync"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let peer = PeerClient::new("b".to_string(), server.uri(), Duration::from_secs(5));
        let err = peer
            .sync_task(&request_for(Task::from_draft(TaskDraft::default())))
            .await
            .unwrap_err();

        assert!(matches!(err, ReplicationError::PeerRejected { status: 500, .. }));
        assert_eq!(peer.status().failed, 1);
        assert_eq!(peer.last_success_timestamp(), 0);
    }

    #[tokio::test]
    async fn test_sync_task_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/internal/sync"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let peer = PeerClient::new("slow".to_string(), server.uri(), Duration::from_millis(100));
        let started = std::time::Instant::now();
        let err = peer
            .sync_task(&request_for(Task::from_draft(TaskDraft::default())))
            .await
            .unwrap_err();

        assert!(err.is_timeout(), "expected timeout, got {}", err);
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_unreachable_peer() {
        // Port 1 on loopback is never listening in test environments
        let peer = PeerClient::new(
            "gone".to_string(),
            "http://127.0.0.1:1".to_string(),
            Duration::from_secs(2),
        );
        let err = peer
            .sync_task(&request_for(Task::from_draft(TaskDraft::default())))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ReplicationError::PeerUnreachable { .. } | ReplicationError::PeerTimeout { .. }
        ));
        assert_eq!(peer.status().failed, 1);
    }

    #[tokio::test]
    async fn test_fetch_snapshot() {
        let server = MockServer::start().await;
        let task = Task::from_draft(TaskDraft::default());
        Mock::given(method("GET"))
            .and(path("/internal/snapshot"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "node_id": "b",
                "tasks": [task.clone()],
                "tombstones": [{"id": "gone", "deleted_at": Utc::now()}]
            })))
            .mount(&server)
            .await;

        let peer = PeerClient::new("b".to_string(), server.uri(), Duration::from_secs(5));
        let snapshot = peer.fetch_snapshot().await.unwrap();

        assert_eq!(snapshot.node_id, "b");
        assert_eq!(snapshot.tasks, vec![task]);
        assert_eq!(snapshot.tombstones[0].id, "gone");
    }
}

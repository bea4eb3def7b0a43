use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tasksync::{Result, TaskSyncError};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:7700";
pub const DEFAULT_SYNC_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_node_id")]
    pub node_id: String,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default)]
    pub peers: Vec<PeerConfig>,
    /// Upper bound for one sync call to one peer.
    #[serde(default = "default_sync_timeout_ms")]
    pub sync_timeout_ms: u64,
    /// Pull a snapshot from the first reachable peer at start-up.
    #[serde(default = "default_catch_up")]
    pub catch_up_on_start: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerConfig {
    pub node_id: String,
    pub addr: String, // e.g., "http://10.0.1.2:7700" or "http://node-b:7700"
}

fn default_node_id() -> String {
    std::env::var("TASKSYNC_NODE_ID").unwrap_or_else(|_| {
        hostname::get()
            .ok()
            .and_then(|h| h.into_string().ok())
            .unwrap_or_else(|| "unknown".to_string())
    })
}

fn default_bind_addr() -> String {
    std::env::var("TASKSYNC_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
}

fn default_sync_timeout_ms() -> u64 {
    DEFAULT_SYNC_TIMEOUT_MS
}

fn default_catch_up() -> bool {
    true
}

fn default_peers() -> Vec<PeerConfig> {
    match std::env::var("TASKSYNC_PEERS") {
        Ok(list) => match PeerConfig::parse_list(&list) {
            Ok(peers) => peers,
            Err(e) => {
                tracing::error!("Ignoring TASKSYNC_PEERS: {}", e);
                vec![]
            }
        },
        Err(_) => vec![],
    }
}

impl PeerConfig {
    /// Parse one peer entry: either `addr` or `node_id=addr`. A bare
    /// `host:port` gets an `http://` scheme.
    pub fn parse(entry: &str) -> Result<Self> {
        let entry = entry.trim();
        let (node_id, addr) = match entry.split_once('=') {
            Some((id, addr)) => (Some(id.trim()), addr.trim()),
            None => (None, entry),
        };

        if node_id == Some("") || addr.is_empty() {
            return Err(TaskSyncError::Config(format!(
                "invalid peer entry '{}'",
                entry
            )));
        }

        let addr = if addr.contains("://") {
            addr.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", addr.trim_end_matches('/'))
        };

        Ok(PeerConfig {
            node_id: node_id.map(str::to_string).unwrap_or_else(|| addr.clone()),
            addr,
        })
    }

    /// Parse a comma-separated peer list; blank entries are skipped.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        list.split(',')
            .filter(|entry| !entry.trim().is_empty())
            .map(PeerConfig::parse)
            .collect()
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            node_id: default_node_id(),
            bind_addr: default_bind_addr(),
            peers: default_peers(),
            sync_timeout_ms: DEFAULT_SYNC_TIMEOUT_MS,
            catch_up_on_start: true,
        }
    }
}

impl NodeConfig {
    /// Load node configuration from a JSON file, or fall back to a standalone
    /// default built from `TASKSYNC_*` environment variables.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<NodeConfig>(&content) {
                    Ok(config) => {
                        tracing::info!(
                            "Loaded node config from {}: node_id={}, peers={}",
                            path.display(),
                            config.node_id,
                            config.peers.len()
                        );
                        return config;
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to parse {}: {}, using defaults",
                            path.display(),
                            e
                        );
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to read {}: {}, using defaults", path.display(), e);
                }
            }
        }

        let config = NodeConfig::default();
        if config.peers.is_empty() {
            tracing::info!(
                "No peers configured, running in standalone mode: node_id={}",
                config.node_id
            );
        }
        config
    }

    pub fn sync_timeout(&self) -> Duration {
        Duration::from_millis(self.sync_timeout_ms)
    }
}

use clap::Parser;
use std::path::PathBuf;
use tasksync::TaskSyncError;
use tasksync_http::serve;
use tasksync_replication::{NodeConfig, PeerConfig};

#[derive(Parser, Debug)]
#[command(name = "tasksync", about = "Replicated in-memory task tracker node")]
struct Cli {
    /// JSON node config; missing file means standalone defaults
    #[arg(long, env = "TASKSYNC_CONFIG", default_value = "./node.json")]
    config: PathBuf,
    #[arg(long, env = "TASKSYNC_NODE_ID")]
    node_id: Option<String>,
    #[arg(long, env = "TASKSYNC_BIND_ADDR")]
    bind_addr: Option<String>,
    /// Comma-separated peer list, each entry `addr` or `node_id=addr`
    #[arg(long, env = "TASKSYNC_PEERS")]
    peers: Option<String>,
    /// Per-peer sync timeout in milliseconds
    #[arg(long, env = "TASKSYNC_SYNC_TIMEOUT_MS")]
    sync_timeout_ms: Option<u64>,
    /// Do not pull a snapshot from a peer at start-up
    #[arg(long)]
    no_catch_up: bool,
}

impl Cli {
    /// File config (or defaults) with command-line values layered on top.
    fn node_config(&self) -> Result<NodeConfig, TaskSyncError> {
        let mut config = NodeConfig::load_or_default(&self.config);

        if let Some(node_id) = &self.node_id {
            config.node_id = node_id.clone();
        }
        if let Some(bind_addr) = &self.bind_addr {
            config.bind_addr = bind_addr.clone();
        }
        if let Some(peers) = &self.peers {
            config.peers = PeerConfig::parse_list(peers)?;
        }
        if let Some(timeout) = self.sync_timeout_ms {
            if timeout == 0 {
                return Err(TaskSyncError::Config(
                    "sync timeout must be greater than zero".to_string(),
                ));
            }
            config.sync_timeout_ms = timeout;
        }
        if self.no_catch_up {
            config.catch_up_on_start = false;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let node_config = cli.node_config()?;
    serve(node_config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "tasksync",
            "--config",
            "/nonexistent/node.json",
            "--node-id",
            "node-a",
            "--bind-addr",
            "0.0.0.0:9000",
            "--peers",
            "node-b=localhost:9001,node-c=http://localhost:9002",
            "--sync-timeout-ms",
            "750",
            "--no-catch-up",
        ]);

        let config = cli.node_config().unwrap();
        assert_eq!(config.node_id, "node-a");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.peers.len(), 2);
        assert_eq!(config.peers[0].addr, "http://localhost:9001");
        assert_eq!(config.sync_timeout_ms, 750);
        assert!(!config.catch_up_on_start);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let cli = Cli::parse_from([
            "tasksync",
            "--config",
            "/nonexistent/node.json",
            "--sync-timeout-ms",
            "0",
        ]);
        assert!(matches!(cli.node_config(), Err(TaskSyncError::Config(_))));
    }
}

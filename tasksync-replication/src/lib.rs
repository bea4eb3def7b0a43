pub mod config;
pub mod error;
pub mod manager;
pub mod peer;
pub mod receiver;
pub mod types;

pub use config::{NodeConfig, PeerConfig};
pub use error::ReplicationError;
pub use manager::{Broadcast, ReplicationManager};
pub use receiver::{ReplicationServer, SyncOutcome};
pub use types::{Change, SyncTaskRequest, SyncTaskResponse};

use thiserror::Error;

/// Failure talking to one peer. Logged by the broadcaster, never surfaced to
/// the local write path.
#[derive(Error, Debug)]
pub enum ReplicationError {
    #[error("peer {peer} timed out after {timeout_ms}ms")]
    PeerTimeout { peer: String, timeout_ms: u64 },

    #[error("peer {peer} unreachable: {reason}")]
    PeerUnreachable { peer: String, reason: String },

    #[error("peer {peer} returned {status}")]
    PeerRejected { peer: String, status: u16 },

    #[error("invalid response from peer {peer}: {reason}")]
    InvalidResponse { peer: String, reason: String },

    #[error("delivery to peer {peer} aborted: {reason}")]
    DeliveryAborted { peer: String, reason: String },

    #[error("no peers configured")]
    NoPeers,
}

impl ReplicationError {
    pub(crate) fn from_send(peer: &str, timeout_ms: u64, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ReplicationError::PeerTimeout {
                peer: peer.to_string(),
                timeout_ms,
            }
        } else {
            ReplicationError::PeerUnreachable {
                peer: peer.to_string(),
                reason: e.to_string(),
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ReplicationError::PeerTimeout { .. })
    }
}

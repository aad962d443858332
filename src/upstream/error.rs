// Transport-level failures of an outbound call.

use std::time::Duration;

/// Everything that can go wrong before a peer hands back a decodable answer.
/// Application-level errors never appear here; they travel inside the response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("invalid address {addr}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("failed to connect to {addr}: {reason}")]
    Connect { addr: String, reason: String },

    #[error("call to {addr} timed out after {timeout:?}")]
    Timeout { addr: String, timeout: Duration },

    #[error("call to {addr} failed: {reason}")]
    Call { addr: String, reason: String },

    #[error("{addr} answered with status {status}")]
    Status { addr: String, status: u16 },

    #[error("undecodable reply from {addr}: {reason}")]
    Decode { addr: String, reason: String },
}

impl TransportError {
    /// True when no connection could be established at all.
    pub fn is_dial(&self) -> bool {
        matches!(
            self,
            TransportError::Connect { .. } | TransportError::InvalidAddress { .. }
        )
    }
}

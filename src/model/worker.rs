// Registration and pool-inspection shapes.

use serde::{Deserialize, Serialize};

/// Canonical reply to a liveness probe. Anything else counts as a failure.
pub const PING_REPLY: &str = "pong";

/// Acknowledgement returned for every accepted registration.
pub const REGISTERED_ACK: &str = "Worker registered successfully";

/// Worker -> coordinator registration call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Externally reachable host:port of the worker.
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
}

/// Point-in-time view of one registry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub address: String,
    pub in_flight: u64,
    pub generation: u64,
    /// Milliseconds since the worker was last seen answering.
    pub last_seen_ms: u64,
}

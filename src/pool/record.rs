// Per-worker bookkeeping held inside the registry.

use std::time::Instant;

use crate::model::WorkerSnapshot;

/// Why a worker left the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
    /// Dial or call failed while dispatching.
    Unreachable,
    /// Liveness probe failed or answered with the wrong token.
    ProbeFailed,
}

impl EvictionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            EvictionReason::Unreachable => "unreachable",
            EvictionReason::ProbeFailed => "probe_failed",
        }
    }
}

/// One registered worker.
#[derive(Debug, Clone)]
pub struct WorkerRecord {
    pub address: String,
    /// Reservations not yet released.
    pub in_flight: u64,
    /// Distinguishes successive registrations of the same address.
    pub generation: u64,
    pub registered_at: Instant,
    pub last_seen: Instant,
}

impl WorkerRecord {
    pub fn new(address: String, generation: u64) -> Self {
        let now = Instant::now();
        Self {
            address,
            in_flight: 0,
            generation,
            registered_at: now,
            last_seen: now,
        }
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            address: self.address.clone(),
            in_flight: self.in_flight,
            generation: self.generation,
            last_seen_ms: self.last_seen.elapsed().as_millis() as u64,
        }
    }
}

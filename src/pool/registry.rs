//! Coordinator-owned map of workers and their in-flight task counters.
//!
//! Every read and write goes through one `parking_lot::Mutex`. Critical
//! sections cover map lookups and mutations only; callers must never hold a
//! guard across network I/O, which the API enforces by never handing the guard
//! out.

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::metrics;
use crate::model::{WorkerSnapshot, REGISTERED_ACK};

use super::record::{EvictionReason, WorkerRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no available workers")]
pub struct NoWorkersAvailable;

struct Inner {
    // Ordered by address so ties in selection resolve to the smallest address.
    workers: BTreeMap<String, WorkerRecord>,
    next_generation: u64,
}

/// Registry of known workers.
pub struct WorkerPool {
    inner: Mutex<Inner>,
}

impl WorkerPool {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                workers: BTreeMap::new(),
                next_generation: 1,
            }),
        })
    }

    /// Adds a worker with a zero counter. Re-registering a present address is a no-op.
    pub fn register(&self, address: &str) -> &'static str {
        let (inserted, size) = {
            let mut inner = self.inner.lock();
            let inserted = if inner.workers.contains_key(address) {
                false
            } else {
                let generation = inner.next_generation;
                inner.next_generation += 1;
                inner
                    .workers
                    .insert(address.to_string(), WorkerRecord::new(address.to_string(), generation));
                true
            };
            (inserted, inner.workers.len())
        };

        if inserted {
            metrics::inc_registered();
            metrics::set_pool_size(size);
            info!(
                component = "pool",
                event = "worker_registered",
                worker = address,
                pool_size = size,
                "Worker registered"
            );
        } else {
            debug!(
                component = "pool",
                event = "worker_already_registered",
                worker = address,
                "worker already known, nothing to change"
            );
        }

        REGISTERED_ACK
    }

    /// Address with the fewest in-flight tasks; ties go to the smallest address.
    pub fn select_least_loaded(&self) -> Result<String, NoWorkersAvailable> {
        let inner = self.inner.lock();
        least_loaded(&inner.workers)
            .map(|record| record.address.clone())
            .ok_or(NoWorkersAvailable)
    }

    /// Selects the least loaded worker and reserves it within one critical
    /// section, so concurrent callers always observe each other's reservations.
    pub fn select_and_reserve(self: &Arc<Self>) -> Result<Reservation, NoWorkersAvailable> {
        let mut inner = self.inner.lock();
        let address = least_loaded(&inner.workers)
            .map(|record| record.address.clone())
            .ok_or(NoWorkersAvailable)?;

        let record = inner.workers.get_mut(&address).ok_or(NoWorkersAvailable)?;
        record.in_flight += 1;
        let generation = record.generation;
        drop(inner);

        Ok(Reservation {
            pool: Arc::clone(self),
            address,
            generation,
        })
    }

    /// Increments the counter. Returns false when the worker is gone.
    pub fn reserve(&self, address: &str) -> bool {
        match self.inner.lock().workers.get_mut(address) {
            Some(record) => {
                record.in_flight += 1;
                true
            }
            None => false,
        }
    }

    /// Decrements the counter. Returns false when the worker is gone.
    pub fn release(&self, address: &str) -> bool {
        match self.inner.lock().workers.get_mut(address) {
            Some(record) => {
                record.in_flight = record.in_flight.saturating_sub(1);
                true
            }
            None => false,
        }
    }

    fn release_generation(&self, address: &str, generation: u64) {
        let mut inner = self.inner.lock();
        if let Some(record) = inner.workers.get_mut(address) {
            // A newer registration of the same address starts from zero and
            // must not absorb releases meant for the evicted one.
            if record.generation == generation {
                record.in_flight = record.in_flight.saturating_sub(1);
            }
        }
    }

    /// Removes the worker regardless of its counter.
    pub fn evict(&self, address: &str, reason: EvictionReason) -> bool {
        let (removed, size) = {
            let mut inner = self.inner.lock();
            let removed = inner.workers.remove(address);
            (removed, inner.workers.len())
        };

        match removed {
            Some(record) => {
                metrics::inc_evicted(reason);
                metrics::set_pool_size(size);
                warn!(
                    component = "pool",
                    event = "worker_evicted",
                    worker = address,
                    reason = reason.as_str(),
                    in_flight = record.in_flight,
                    pool_size = size,
                    "Removed failed worker"
                );
                true
            }
            None => false,
        }
    }

    /// Marks the worker as seen alive now.
    pub fn touch(&self, address: &str) {
        if let Some(record) = self.inner.lock().workers.get_mut(address) {
            record.last_seen = std::time::Instant::now();
        }
    }

    pub fn in_flight(&self, address: &str) -> Option<u64> {
        self.inner.lock().workers.get(address).map(|r| r.in_flight)
    }

    pub fn contains(&self, address: &str) -> bool {
        self.inner.lock().workers.contains_key(address)
    }

    /// Registered addresses in selection order.
    pub fn addresses(&self) -> Vec<String> {
        self.inner.lock().workers.keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<WorkerSnapshot> {
        self.inner
            .lock()
            .workers
            .values()
            .map(WorkerRecord::snapshot)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn least_loaded(workers: &BTreeMap<String, WorkerRecord>) -> Option<&WorkerRecord> {
    // min_by_key keeps the first minimum, i.e. the smallest address.
    workers.values().min_by_key(|record| record.in_flight)
}

/// Capacity held on one worker. Dropping it releases the reservation, which
/// keeps reserve/release balanced on every exit path of a dispatch.
#[must_use = "dropping a reservation releases it immediately"]
pub struct Reservation {
    pool: Arc<WorkerPool>,
    address: String,
    generation: u64,
}

impl Reservation {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.pool.release_generation(&self.address, self.generation);
    }
}

impl std::fmt::Debug for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("address", &self.address)
            .field("generation", &self.generation)
            .finish()
    }
}

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::ProbeError;
use crate::metrics;
use crate::model::PING_REPLY;
use crate::pool::{EvictionReason, WorkerPool};
use crate::upstream::WorkerClient;

/// Periodically pings every registered worker and evicts the ones that do not
/// answer with the expected token.
pub struct LivenessMonitor {
    pool: Arc<WorkerPool>,
    client: Arc<dyn WorkerClient>,
    interval: Duration,
}

impl LivenessMonitor {
    pub fn new(pool: Arc<WorkerPool>, client: Arc<dyn WorkerClient>, interval: Duration) -> Self {
        Self {
            pool,
            client,
            interval,
        }
    }

    /// Runs the monitor in its own task until `shutdown` is cancelled.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    pub async fn run(&self, shutdown: CancellationToken) {
        // First tick one full period after start, like a plain ticker.
        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            component = "liveness",
            event = "monitor_started",
            interval = ?self.interval,
            "Liveness monitor started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!(component = "liveness", event = "monitor_stopped", "Liveness monitor stopped");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// Probes every worker once and returns the evicted addresses.
    pub async fn tick(&self) -> Vec<String> {
        let addresses = self.pool.addresses();
        if addresses.is_empty() {
            return Vec::new();
        }

        let results = join_all(addresses.iter().map(|addr| self.probe(addr))).await;
        metrics::add_probes(addresses.len() as u64);

        let mut failed = 0u64;
        let mut evicted = Vec::new();
        for (addr, result) in addresses.into_iter().zip(results) {
            match result {
                Ok(()) => self.pool.touch(&addr),
                Err(err) => {
                    failed += 1;
                    warn!(
                        component = "liveness",
                        event = "probe_failed",
                        worker = %addr,
                        error = %err,
                        "Worker failed liveness probe"
                    );
                    if self.pool.evict(&addr, EvictionReason::ProbeFailed) {
                        evicted.push(addr);
                    }
                }
            }
        }

        if failed > 0 {
            metrics::add_probe_failures(failed);
        }
        debug!(
            component = "liveness",
            event = "tick_done",
            evicted = evicted.len(),
            pool_size = self.pool.len(),
            "liveness tick finished"
        );
        evicted
    }

    /// One probe. The per-probe timeout is enforced by the client.
    pub async fn probe(&self, address: &str) -> Result<(), ProbeError> {
        let reply = self.client.ping(address).await?;
        if reply == PING_REPLY {
            Ok(())
        } else {
            Err(ProbeError::UnexpectedReply(reply))
        }
    }
}

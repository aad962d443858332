//! Tests for liveness probing with a scripted ping client.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::{LivenessMonitor, ProbeError};
use crate::model::{MatrixRequest, MatrixResponse};
use crate::pool::WorkerPool;
use crate::upstream::{TransportError, WorkerClient};

/// Answers pings from a table; unknown addresses refuse the connection.
#[derive(Default)]
struct PingTable {
    replies: Mutex<HashMap<String, Result<String, TransportError>>>,
}

impl PingTable {
    fn set(&self, addr: &str, reply: Result<&str, TransportError>) {
        self.replies
            .lock()
            .insert(addr.to_string(), reply.map(str::to_string));
    }
}

#[async_trait::async_trait]
impl WorkerClient for PingTable {
    async fn ping(&self, address: &str) -> Result<String, TransportError> {
        self.replies
            .lock()
            .get(address)
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::Connect {
                    addr: address.to_string(),
                    reason: "connection refused".to_string(),
                })
            })
    }

    async fn compute(
        &self,
        _address: &str,
        _req: &MatrixRequest,
    ) -> Result<MatrixResponse, TransportError> {
        unreachable!("monitor never computes")
    }
}

fn monitor(pool: &Arc<WorkerPool>, table: &Arc<PingTable>, every: Duration) -> LivenessMonitor {
    LivenessMonitor::new(
        Arc::clone(pool),
        Arc::clone(table) as Arc<dyn WorkerClient>,
        every,
    )
}

#[tokio::test]
async fn test_tick_keeps_healthy_and_evicts_failures() {
    let pool = WorkerPool::new();
    for addr in ["ok:1", "down:1", "rude:1", "slow:1"] {
        pool.register(addr);
    }
    let table = Arc::new(PingTable::default());
    table.set("ok:1", Ok("pong"));
    table.set("rude:1", Ok("PONG"));
    table.set(
        "slow:1",
        Err(TransportError::Timeout {
            addr: "slow:1".to_string(),
            timeout: Duration::from_secs(2),
        }),
    );

    let mut evicted = monitor(&pool, &table, Duration::from_secs(5)).tick().await;
    evicted.sort();

    assert_eq!(evicted, vec!["down:1", "rude:1", "slow:1"]);
    assert_eq!(pool.addresses(), vec!["ok:1".to_string()]);
}

#[tokio::test]
async fn test_tick_on_empty_pool_is_noop() {
    let pool = WorkerPool::new();
    let table = Arc::new(PingTable::default());

    assert!(monitor(&pool, &table, Duration::from_secs(5))
        .tick()
        .await
        .is_empty());
}

#[tokio::test]
async fn test_probe_classifies_wrong_token() {
    let pool = WorkerPool::new();
    let table = Arc::new(PingTable::default());
    table.set("w:1", Ok("ping"));

    let err = monitor(&pool, &table, Duration::from_secs(5))
        .probe("w:1")
        .await
        .unwrap_err();
    assert_eq!(err, ProbeError::UnexpectedReply("ping".to_string()));
}

#[tokio::test]
async fn test_eviction_does_not_touch_outstanding_reservation_of_survivor() {
    let pool = WorkerPool::new();
    pool.register("a:1");
    pool.register("b:1");
    let table = Arc::new(PingTable::default());
    table.set("b:1", Ok("pong"));

    assert!(pool.reserve("b:1"));
    monitor(&pool, &table, Duration::from_secs(5)).tick().await;

    assert!(!pool.contains("a:1"));
    assert_eq!(pool.in_flight("b:1"), Some(1));
}

#[tokio::test(start_paused = true)]
async fn test_run_ticks_periodically_and_stops_on_shutdown() {
    let pool = WorkerPool::new();
    pool.register("gone:1");
    let table = Arc::new(PingTable::default());
    let shutdown = CancellationToken::new();

    let handle = monitor(&pool, &table, Duration::from_secs(5)).spawn(shutdown.clone());

    // Nothing happens before the first period elapses.
    tokio::time::sleep(Duration::from_secs(4)).await;
    assert!(pool.contains("gone:1"));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!pool.contains("gone:1"));

    shutdown.cancel();
    handle.await.unwrap();
}

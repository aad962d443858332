use std::time::Duration;

use crate::tests::support::{
    eventually, register, worker_addresses, Cluster, FakeWorker, PingMode,
};

#[tokio::test]
async fn test_wrong_probe_token_evicts_worker() {
    let cluster = Cluster::start(1).await;
    let rude = FakeWorker::start(PingMode::WrongToken, true).await;
    let healthy = cluster.workers[0].addr().to_string();

    register(cluster.addr(), rude.addr()).await;
    assert!(cluster.coordinator.pool().contains(rude.addr()));

    let pool = cluster.coordinator.pool().clone();
    let rude_addr = rude.addr().to_string();
    assert!(eventually(Duration::from_secs(3), || {
        let pool = pool.clone();
        let rude_addr = rude_addr.clone();
        async move { !pool.contains(&rude_addr) }
    })
    .await);

    assert_eq!(worker_addresses(cluster.addr()).await, vec![healthy]);
    cluster.stop().await;
}

#[tokio::test]
async fn test_probe_error_status_evicts_worker() {
    let cluster = Cluster::start(0).await;
    let broken = FakeWorker::start(PingMode::ServerError, true).await;

    register(cluster.addr(), broken.addr()).await;

    let pool = cluster.coordinator.pool().clone();
    assert!(eventually(Duration::from_secs(3), || {
        let pool = pool.clone();
        async move { pool.is_empty() }
    })
    .await);
    cluster.stop().await;
}

#[tokio::test]
async fn test_stopped_worker_is_evicted_and_survivor_kept() {
    let mut cluster = Cluster::start(2).await;
    let gone = cluster.workers.remove(0);
    let gone_addr = gone.addr().to_string();
    let survivor = cluster.workers[0].addr().to_string();
    gone.stop().await;

    let pool = cluster.coordinator.pool().clone();
    assert!(eventually(Duration::from_secs(3), || {
        let pool = pool.clone();
        let gone_addr = gone_addr.clone();
        async move { !pool.contains(&gone_addr) }
    })
    .await);

    assert_eq!(worker_addresses(cluster.addr()).await, vec![survivor]);
    cluster.stop().await;
}

#[tokio::test]
async fn test_healthy_workers_survive_many_ticks() {
    let cluster = Cluster::start(2).await;

    // new_test_config probes every 200ms
    tokio::time::sleep(Duration::from_millis(1000)).await;

    assert_eq!(worker_addresses(cluster.addr()).await.len(), 2);
    let snapshot = crate::tests::support::workers(cluster.addr()).await;
    assert!(snapshot.iter().all(|w| w.last_seen_ms < 1000));
    cluster.stop().await;
}

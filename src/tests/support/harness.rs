// Integration test harness: real coordinator and worker processes in-process.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::app::{CoordinatorApp, WorkerApp};
use crate::config::{self, Config};
use crate::pool::WorkerPool;

/// Running coordinator.
pub struct CoordinatorServer {
    addr: String,
    pool: Arc<WorkerPool>,
    shutdown_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl CoordinatorServer {
    pub async fn start(cfg: Config) -> Self {
        let shutdown_token = CancellationToken::new();
        let app = CoordinatorApp::new(shutdown_token.clone(), cfg)
            .await
            .expect("coordinator binds");
        let addr = app.local_addr().to_string();
        let pool = app.pool();

        let handle = tokio::spawn(async move {
            if let Err(e) = app.serve().await {
                eprintln!("[coordinator] serve failed: {}", e);
            }
        });

        Self {
            addr,
            pool,
            shutdown_token,
            handle,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub async fn stop(self) {
        self.shutdown_token.cancel();
        let _ = self.handle.await;
    }
}

/// Running worker that has already registered.
pub struct WorkerServer {
    addr: String,
    shutdown_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl WorkerServer {
    pub async fn start(coordinator: &str) -> Self {
        let mut cfg = config::new_test_config();
        cfg.root.worker.coordinator = coordinator.to_string();

        let shutdown_token = CancellationToken::new();
        let app = WorkerApp::new(shutdown_token.clone(), cfg)
            .await
            .expect("worker binds");
        app.register().await.expect("worker registers");
        let addr = app.advertised_addr().to_string();

        let handle = tokio::spawn(async move {
            if let Err(e) = app.listen_and_serve().await {
                eprintln!("[worker] serve failed: {}", e);
            }
        });

        Self {
            addr,
            shutdown_token,
            handle,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Stops serving; the coordinator is not told.
    pub async fn stop(self) {
        self.shutdown_token.cancel();
        let _ = self.handle.await;
    }
}

/// Coordinator plus `n` registered workers.
pub struct Cluster {
    pub coordinator: CoordinatorServer,
    pub workers: Vec<WorkerServer>,
}

impl Cluster {
    pub async fn start(workers: usize) -> Self {
        Self::start_with(config::new_test_config(), workers).await
    }

    /// Same as [`Cluster::start`] but with the liveness monitor effectively off.
    pub async fn start_quiet(workers: usize) -> Self {
        let mut cfg = config::new_test_config();
        cfg.root.coordinator.probe_interval = Duration::from_secs(3600);
        Self::start_with(cfg, workers).await
    }

    pub async fn start_with(cfg: Config, workers: usize) -> Self {
        let coordinator = CoordinatorServer::start(cfg).await;
        let mut started = Vec::with_capacity(workers);
        for _ in 0..workers {
            started.push(WorkerServer::start(coordinator.addr()).await);
        }
        Self {
            coordinator,
            workers: started,
        }
    }

    pub fn addr(&self) -> &str {
        self.coordinator.addr()
    }

    pub async fn stop(self) {
        for w in self.workers {
            w.stop().await;
        }
        self.coordinator.stop().await;
    }
}

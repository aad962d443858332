// Coordinator process: worker registry, dispatcher, liveness monitor and API.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::{Config, ConfigTrait};
use crate::controller::{
    ComputeController, Controller, PrometheusMetricsController, RegisterController,
    WorkersController,
};
use crate::dispatch::{Dispatcher, RetryPolicy};
use crate::http::client::create_client;
use crate::http::HttpServer;
use crate::liveness::LivenessMonitor;
use crate::middleware::{Middleware, PanicRecoverMiddleware, TraceMiddleware};
use crate::pool::WorkerPool;
use crate::upstream::{BackendImpl, WorkerClient};

// Headroom over the worst-case dispatch before the server gives up on a request.
const REQUEST_TIMEOUT_SLACK: Duration = Duration::from_secs(5);

pub struct CoordinatorApp {
    cfg: Config,
    shutdown_token: CancellationToken,
    pool: Arc<WorkerPool>,
    client: Arc<dyn WorkerClient>,
    server: HttpServer,
}

impl CoordinatorApp {
    /// Binds the coordinator API using the HTTP worker client.
    pub async fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let c = cfg.coordinator();
        let client = Arc::new(BackendImpl::new(
            create_client(),
            c.call_timeout,
            c.probe_timeout,
        ));
        Self::with_client(shutdown_token, cfg, client).await
    }

    /// Binds the coordinator API with a caller-provided worker client.
    pub async fn with_client(
        shutdown_token: CancellationToken,
        cfg: Config,
        client: Arc<dyn WorkerClient>,
    ) -> Result<Self> {
        let pool = WorkerPool::new();
        let c = cfg.coordinator();
        let policy = RetryPolicy::new(c.dispatch_attempts);
        let dispatcher = Arc::new(Dispatcher::new(
            Arc::clone(&pool),
            Arc::clone(&client),
            policy,
        ));

        let controllers: Vec<Box<dyn Controller>> = vec![
            // Workers announce themselves here
            Box::new(RegisterController::new(Arc::clone(&pool))),
            // Client computations
            Box::new(ComputeController::new(dispatcher)),
            // Registry snapshot
            Box::new(WorkersController::new(Arc::clone(&pool))),
            Box::new(PrometheusMetricsController::new()),
        ];
        let middlewares: Vec<Box<dyn Middleware>> = vec![
            Box::new(TraceMiddleware::new()),
            Box::new(PanicRecoverMiddleware::new()),
        ];

        let request_timeout = c.call_timeout * policy.max_attempts() + REQUEST_TIMEOUT_SLACK;
        let server = HttpServer::bind(
            "coordinator",
            &c.addr,
            shutdown_token.clone(),
            controllers,
            middlewares,
            request_timeout,
        )
        .await?;

        Ok(Self {
            cfg,
            shutdown_token,
            pool,
            client,
            server,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    pub fn pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.pool)
    }

    /// Runs the API and the liveness monitor until shutdown.
    pub async fn serve(self) -> Result<()> {
        let Self {
            cfg,
            shutdown_token,
            pool,
            client,
            server,
        } = self;

        let c = cfg.coordinator();
        info!(
            component = "coordinator",
            event = "starting",
            addr = %server.local_addr(),
            probe_interval = ?c.probe_interval,
            dispatch_attempts = c.dispatch_attempts,
            "coordinator starting"
        );

        let monitor = LivenessMonitor::new(pool, client, c.probe_interval)
            .spawn(shutdown_token.clone());

        let result = server.listen_and_serve().await;

        // A server failure must not leave the monitor running.
        shutdown_token.cancel();
        if let Err(e) = monitor.await {
            error!(
                component = "coordinator",
                event = "monitor_join_failed",
                error = %e,
                "liveness monitor task failed"
            );
        }

        result
    }
}

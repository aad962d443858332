// Worker process: registers with the coordinator, then executes operations.

use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::{Config, ConfigTrait};
use crate::controller::{Controller, ExecuteController, PingController};
use crate::http::client::create_client;
use crate::http::HttpServer;
use crate::middleware::{Middleware, PanicRecoverMiddleware, TraceMiddleware};
use crate::upstream::CoordinatorClient;

const WORKER_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct WorkerApp {
    server: HttpServer,
    advertised: String,
    coordinator: CoordinatorClient,
}

impl WorkerApp {
    /// Binds the worker listener and works out the address to announce.
    pub async fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let w = cfg.worker();

        let controllers: Vec<Box<dyn Controller>> = vec![
            Box::new(PingController::new()),
            Box::new(ExecuteController::new()),
        ];
        let middlewares: Vec<Box<dyn Middleware>> = vec![
            Box::new(TraceMiddleware::new()),
            Box::new(PanicRecoverMiddleware::new()),
        ];

        let server = HttpServer::bind(
            "worker",
            &w.addr,
            shutdown_token,
            controllers,
            middlewares,
            WORKER_REQUEST_TIMEOUT,
        )
        .await?;

        let advertised = advertise_addr(w.advertise.as_deref(), server.local_addr());
        let coordinator =
            CoordinatorClient::new(create_client(), w.coordinator.clone(), w.register_timeout);

        Ok(Self {
            server,
            advertised,
            coordinator,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.server.local_addr()
    }

    /// Address the coordinator is told to reach this worker at.
    pub fn advertised_addr(&self) -> &str {
        &self.advertised
    }

    /// Announces this worker once. Failure is fatal for the process.
    pub async fn register(&self) -> Result<String> {
        let ack = self
            .coordinator
            .register(&self.advertised)
            .await
            .with_context(|| {
                format!(
                    "failed to register {} with coordinator {}",
                    self.advertised,
                    self.coordinator.address()
                )
            })?;

        info!(
            component = "worker",
            event = "registered",
            advertised = %self.advertised,
            coordinator = self.coordinator.address(),
            "{}", ack
        );
        Ok(ack)
    }

    /// Registers, then serves until shutdown.
    pub async fn serve(self) -> Result<()> {
        self.register().await?;
        self.listen_and_serve().await
    }

    /// Serves without registering; for callers that registered already.
    pub async fn listen_and_serve(self) -> Result<()> {
        self.server.listen_and_serve().await
    }
}

/// Picks the announced address: an explicit setting wins, otherwise the bound
/// socket with an unspecified host replaced by loopback.
pub fn advertise_addr(advertise: Option<&str>, bound: SocketAddr) -> String {
    if let Some(addr) = advertise.map(str::trim).filter(|a| !a.is_empty()) {
        return addr.to_string();
    }
    if bound.ip().is_unspecified() {
        return SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), bound.port()).to_string();
    }
    bound.to_string()
}

// Main entrypoint for the matdispatch binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use matdispatch::app::{ClientApp, CoordinatorApp, WorkerApp};
use matdispatch::config::{Config, ConfigTrait};
use matdispatch::shutdown::GracefulShutdown;

const CONFIG_PATH: &str = "cfg/matdispatch.cfg.yaml";
const CONFIG_PATH_LOCAL: &str = "cfg/matdispatch.cfg.local.yaml";

const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// matdispatch - distributes matrix computations over a pool of workers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, value_name = "FILE", global = true)]
    cfg: Option<PathBuf>,

    #[command(subcommand)]
    role: Role,
}

#[derive(Subcommand, Debug)]
enum Role {
    /// Runs the coordinator: worker registry, dispatcher and liveness monitor
    Coordinator {
        /// Listen address, overrides coordinator.addr
        #[arg(long)]
        addr: Option<String>,
    },
    /// Runs a worker that registers with the coordinator
    Worker {
        /// Listen address, overrides worker.addr
        #[arg(long)]
        addr: Option<String>,
        /// Address announced to the coordinator, overrides worker.advertise
        #[arg(long)]
        advertise: Option<String>,
        /// Coordinator address, overrides worker.coordinator
        #[arg(long)]
        coordinator: Option<String>,
    },
    /// Sends the reference computations and prints the answers
    Client {
        /// Coordinator address, overrides client.coordinator
        #[arg(long)]
        coordinator: Option<String>,
        /// Times each reference request is sent, overrides client.rounds
        #[arg(long)]
        rounds: Option<usize>,
    },
}

/// Loads the configuration struct from YAML file.
/// Tries local config first, then the default one, then built-in defaults.
fn load_cfg(path: Option<PathBuf>) -> Result<(Config, String)> {
    if let Some(custom_path) = path {
        let cfg = Config::load(&custom_path)
            .with_context(|| format!("failed to load custom config from {:?}", custom_path))?;
        return Ok((cfg, custom_path.display().to_string()));
    }

    if let Ok(cfg) = Config::load(CONFIG_PATH_LOCAL) {
        return Ok((cfg, CONFIG_PATH_LOCAL.to_string()));
    }

    if PathBuf::from(CONFIG_PATH).exists() {
        let cfg = Config::load(CONFIG_PATH)
            .with_context(|| format!("failed to load config from {}", CONFIG_PATH))?;
        return Ok((cfg, CONFIG_PATH.to_string()));
    }

    Ok((Config::default(), "<defaults>".to_string()))
}

/// Applies command-line overrides on top of the loaded configuration.
fn apply_overrides(cfg: &mut Config, role: &Role) -> Result<()> {
    match role {
        Role::Coordinator { addr } => {
            if let Some(addr) = addr {
                cfg.root.coordinator.addr = addr.clone();
            }
        }
        Role::Worker {
            addr,
            advertise,
            coordinator,
        } => {
            if let Some(addr) = addr {
                cfg.root.worker.addr = addr.clone();
            }
            if advertise.is_some() {
                cfg.root.worker.advertise = advertise.clone();
            }
            if let Some(coordinator) = coordinator {
                cfg.root.worker.coordinator = coordinator.clone();
            }
        }
        Role::Client {
            coordinator,
            rounds,
        } => {
            if let Some(coordinator) = coordinator {
                cfg.root.client.coordinator = coordinator.clone();
            }
            if let Some(rounds) = rounds {
                cfg.root.client.rounds = *rounds;
            }
        }
    }
    cfg.validate()
}

/// Configures structured logging based on configuration.
fn configure_logger(cfg: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let log_level = cfg
        .logs()
        .and_then(|logs| logs.level.as_deref())
        .unwrap_or("info");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if cfg.is_prod() {
        // Production: JSON format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        // Development: Pretty console format
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().pretty())
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut cfg, cfg_path) = load_cfg(args.cfg)?;
    apply_overrides(&mut cfg, &args.role)?;

    configure_logger(&cfg);
    info!(
        component = "config",
        event = "load_success",
        path = %cfg_path,
        "config loaded"
    );

    if matches!(args.role, Role::Coordinator { .. }) {
        if let Err(e) = matdispatch::controller::metrics::init_prometheus_exporter() {
            warn!(
                component = "main",
                event = "metrics_init_failed",
                error = %e,
                "metrics endpoint will not be available"
            );
        }
    }

    tokio::runtime::Runtime::new()
        .context("Failed to create tokio runtime")?
        .block_on(async_main(args.role, cfg))
}

async fn async_main(role: Role, cfg: Config) -> Result<()> {
    match role {
        Role::Client { .. } => run_client(cfg).await,
        Role::Coordinator { .. } => {
            let shutdown_token = CancellationToken::new();
            let app = CoordinatorApp::new(shutdown_token.clone(), cfg).await?;
            run_service("coordinator", shutdown_token, app.serve()).await
        }
        Role::Worker { .. } => {
            let shutdown_token = CancellationToken::new();
            let app = WorkerApp::new(shutdown_token.clone(), cfg).await?;
            // Registration failure ends the process before anything is served.
            app.register().await?;
            run_service("worker", shutdown_token, app.listen_and_serve()).await
        }
    }
}

/// Runs a long-lived service under the graceful shutdown handler.
async fn run_service<F>(name: &'static str, shutdown_token: CancellationToken, service: F) -> Result<()>
where
    F: std::future::Future<Output = Result<()>> + Send + 'static,
{
    let graceful_shutdown =
        GracefulShutdown::new(shutdown_token.clone()).with_graceful_timeout(GRACEFUL_TIMEOUT);

    let token = shutdown_token.clone();
    graceful_shutdown.spawn(async move {
        if let Err(e) = service.await {
            error!(
                component = "main",
                scope = name,
                event = "serve_failed",
                error = %e,
                "service stopped with error"
            );
        }
        // Let await_shutdown return if the service ends on its own.
        token.cancel();
    });

    if let Err(e) = graceful_shutdown.await_shutdown().await {
        error!(
            component = "main",
            scope = name,
            event = "graceful_shutdown_failed",
            error = %e,
            "failed to gracefully shut down service"
        );
        return Err(e);
    }

    Ok(())
}

async fn run_client(cfg: Config) -> Result<()> {
    let client = ClientApp::new(&cfg);
    let outcomes = client.run().await;

    let mut failed = 0usize;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(matrix) => {
                println!("Computed Answer ({}):", outcome.operation);
                print!("{}", matrix);
            }
            Err(e) => {
                failed += 1;
                println!("Failed ({}): {}", outcome.operation, e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} computations failed", failed, outcomes.len());
    }
    Ok(())
}

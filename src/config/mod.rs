// Configuration loading and management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PROD: &str = "prod";
pub const DEV: &str = "dev";
pub const TEST: &str = "test";

pub const DEFAULT_COORDINATOR_ADDR: &str = "0.0.0.0:5000";
pub const DEFAULT_COORDINATOR_TARGET: &str = "127.0.0.1:5000";
pub const DEFAULT_WORKER_ADDR: &str = "0.0.0.0:0";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Settings {
    #[serde(rename = "matdispatch")]
    pub root: SettingsBox,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SettingsBox {
    #[serde(default = "default_env")]
    pub env: String,
    #[serde(default)]
    pub logs: Option<Logs>,
    #[serde(default)]
    pub coordinator: Coordinator,
    #[serde(default)]
    pub worker: Worker,
    #[serde(default)]
    pub client: Client,
}

impl Default for SettingsBox {
    fn default() -> Self {
        Self {
            env: default_env(),
            logs: None,
            coordinator: Coordinator::default(),
            worker: Worker::default(),
            client: Client::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logs {
    pub level: Option<String>,
}

/// Coordinator process settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Coordinator {
    /// Listen address of the coordinator API.
    pub addr: String,
    /// Period of the liveness monitor.
    #[serde(with = "humantime_serde")]
    pub probe_interval: Duration,
    /// Budget of a single liveness probe.
    #[serde(with = "humantime_serde")]
    pub probe_timeout: Duration,
    /// Budget of a single worker compute call.
    #[serde(with = "humantime_serde")]
    pub call_timeout: Duration,
    /// Total SELECT..CALL cycles per computation.
    pub dispatch_attempts: u32,
}

impl Default for Coordinator {
    fn default() -> Self {
        Self {
            addr: DEFAULT_COORDINATOR_ADDR.to_string(),
            probe_interval: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            call_timeout: Duration::from_secs(30),
            dispatch_attempts: 3,
        }
    }
}

/// Worker process settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Worker {
    /// Listen address; port 0 picks an ephemeral port.
    pub addr: String,
    /// Address announced to the coordinator. Derived from the bound socket when unset.
    pub advertise: Option<String>,
    /// Coordinator to register with.
    pub coordinator: String,
    #[serde(with = "humantime_serde")]
    pub register_timeout: Duration,
}

impl Default for Worker {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WORKER_ADDR.to_string(),
            advertise: None,
            coordinator: DEFAULT_COORDINATOR_TARGET.to_string(),
            register_timeout: Duration::from_secs(5),
        }
    }
}

/// Demo client settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Client {
    pub coordinator: String,
    /// How many times each reference request is sent.
    pub rounds: usize,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self {
            coordinator: DEFAULT_COORDINATOR_TARGET.to_string(),
            rounds: 10,
            timeout: Duration::from_secs(30),
        }
    }
}

fn default_env() -> String {
    DEV.to_string()
}

// Config trait
pub trait ConfigTrait {
    fn logs(&self) -> Option<&Logs>;
    fn is_prod(&self) -> bool;
    fn is_dev(&self) -> bool;
    fn is_test(&self) -> bool;
    fn coordinator(&self) -> &Coordinator;
    fn worker(&self) -> &Worker;
    fn client(&self) -> &Client;
}

// Config type alias for convenience
pub type Config = Settings;

impl ConfigTrait for Config {
    fn logs(&self) -> Option<&Logs> {
        self.root.logs.as_ref()
    }

    fn is_prod(&self) -> bool {
        self.root.env == PROD
    }

    fn is_dev(&self) -> bool {
        self.root.env == DEV
    }

    fn is_test(&self) -> bool {
        self.root.env == TEST
    }

    fn coordinator(&self) -> &Coordinator {
        &self.root.coordinator
    }

    fn worker(&self) -> &Worker {
        &self.root.worker
    }

    fn client(&self) -> &Client {
        &self.root.client
    }
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let abs_path = path
            .canonicalize()
            .with_context(|| format!("failed to resolve absolute config filepath: {:?}", path))?;

        let data = std::fs::read_to_string(&abs_path)
            .with_context(|| format!("read config yaml file {:?}", abs_path))?;

        Self::from_yaml(&data).with_context(|| format!("invalid config in {:?}", abs_path))
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(data: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(data).context("unmarshal yaml")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects settings that would stall or disable the dispatcher.
    pub fn validate(&self) -> Result<()> {
        let c = &self.root.coordinator;
        if c.probe_interval.is_zero() {
            anyhow::bail!("coordinator.probe_interval must be positive");
        }
        if c.probe_timeout.is_zero() || c.call_timeout.is_zero() {
            anyhow::bail!("coordinator timeouts must be positive");
        }
        if c.dispatch_attempts == 0 {
            anyhow::bail!("coordinator.dispatch_attempts must be at least 1");
        }
        if self.root.worker.coordinator.trim().is_empty() {
            anyhow::bail!("worker.coordinator must name the coordinator address");
        }
        if self.root.worker.register_timeout.is_zero() || self.root.client.timeout.is_zero() {
            anyhow::bail!("worker/client timeouts must be positive");
        }
        Ok(())
    }
}

// Test config is always available for integration tests
mod test_config;
pub use test_config::new_test_config;

#[cfg(test)]
mod config_test;

//! Background liveness probing of registered workers.

pub mod error;
pub mod monitor;

#[cfg(test)]
mod monitor_test;

pub use error::ProbeError;
pub use monitor::LivenessMonitor;

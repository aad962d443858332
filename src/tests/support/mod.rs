// Shared test support code for integration tests.
// Every case starts its own cluster on ephemeral ports, so cases never share state.

pub mod common;
pub mod fake_worker;
pub mod harness;

pub use common::*;
pub use fake_worker::{FakeWorker, PingMode};
pub use harness::{Cluster, CoordinatorServer, WorkerServer};

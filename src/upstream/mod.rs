//! Outbound HTTP calls to peer processes: coordinator -> worker and
//! worker/client -> coordinator.

pub mod backend;
mod backend_hyper_impl;
pub mod coordinator;
pub mod error;
pub mod upstream;

#[cfg(test)]
mod backend_test;

pub use backend::BackendImpl;
pub use coordinator::{CoordinatorClient, CoordinatorError};
pub use error::TransportError;
pub use upstream::WorkerClient;

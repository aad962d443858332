#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod app;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod http;
pub mod liveness;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod ops;
pub mod pool;
pub mod shutdown;
pub mod upstream;

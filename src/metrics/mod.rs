//! Prometheus metrics functionality.
//!
//! Metric names and recording helpers live in [`meter`]; the exporter and the
//! `/metrics` route live in `controller::metrics`. Without an installed
//! recorder every helper is a no-op, which is what tests and workers run with.

pub mod meter;

pub use meter::*;

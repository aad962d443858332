// HTTP API controllers for the coordinator and worker endpoints.

pub mod compute;
pub mod controller;
pub mod execute;
pub mod metrics;
pub mod ping;
pub mod register;
pub mod workers;


pub use compute::ComputeController;
pub use controller::Controller;
pub use execute::ExecuteController;
pub use metrics::PrometheusMetricsController;
pub use ping::PingController;
pub use register::RegisterController;
pub use workers::WorkersController;

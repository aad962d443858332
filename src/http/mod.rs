// HTTP module: pooled outbound client and the inbound server.

pub mod client;
pub mod server;

pub use server::HttpServer;

pub use crate::controller::Controller;
pub use crate::middleware::Middleware;

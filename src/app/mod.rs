// Process roles: coordinator, worker and the demo client.

pub mod client;
pub mod coordinator;
pub mod worker;


pub use client::{ClientApp, Outcome};
pub use coordinator::CoordinatorApp;
pub use worker::WorkerApp;

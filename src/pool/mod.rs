//! Worker pool registry: registration, least-loaded selection, load accounting
//! and eviction.

pub mod record;
pub mod registry;


pub use record::{EvictionReason, WorkerRecord};
pub use registry::{NoWorkersAvailable, Reservation, WorkerPool};

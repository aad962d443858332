//! Places one computation on a worker: select, reserve, call, release, with
//! bounded retry over transport failures.

pub mod coordinator;
pub mod error;
pub mod policy;


pub use coordinator::Dispatcher;
pub use error::DispatchError;
pub use policy::RetryPolicy;

//! Matrix operation kernels executed by workers.

pub mod error;
pub mod execute;
pub mod kernels;


pub use error::KernelError;
pub use execute::{execute, respond, MAX_RESULT_CELLS};
pub use kernels::{add, multiply, transpose, validate};

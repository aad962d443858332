//! Wire contract shared by the client, the coordinator and the workers.

pub mod matrix;
pub mod request;
pub mod worker;


pub use matrix::{Cell, Matrix};
pub use request::{MatrixRequest, MatrixResponse, Operation};
pub use worker::{RegisterRequest, RegisterResponse, WorkerSnapshot, PING_REPLY, REGISTERED_ACK};

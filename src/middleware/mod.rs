// Router-wide layers shared by the coordinator and worker servers.

pub mod middleware;
pub mod recover_middleware;
pub mod trace_middleware;

pub use middleware::Middleware;
pub use recover_middleware::PanicRecoverMiddleware;
pub use trace_middleware::TraceMiddleware;

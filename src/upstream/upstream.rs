// Package upstream defines how the coordinator talks to workers.

use crate::model::{MatrixRequest, MatrixResponse};

use super::TransportError;

/// Outbound calls the coordinator makes to a worker.
///
/// Implementations must report every transport-level problem (dial, timeout,
/// bad status, undecodable body) as `Err`, and hand application-level failures
/// back untouched inside `MatrixResponse::error`.
#[async_trait::async_trait]
pub trait WorkerClient: Send + Sync {
    /// Sends a liveness probe and returns the raw reply token.
    async fn ping(&self, address: &str) -> Result<String, TransportError>;

    /// Forwards one computation to the worker.
    async fn compute(
        &self,
        address: &str,
        req: &MatrixRequest,
    ) -> Result<MatrixResponse, TransportError>;
}

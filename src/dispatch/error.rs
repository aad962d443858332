use crate::upstream::TransportError;

/// Why a computation could not be placed on any worker.
///
/// Both variants are placement failures. Validation errors never show up here:
/// they travel back inside the worker's response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("no available workers")]
    NoWorkersAvailable,

    #[error("worker unavailable after {attempts} attempt(s): {last_error}")]
    WorkerUnavailable {
        attempts: u32,
        last_error: TransportError,
    },
}

impl DispatchError {
    /// Metric label of the failure.
    pub fn reason(&self) -> &'static str {
        match self {
            DispatchError::NoWorkersAvailable => "no_workers",
            DispatchError::WorkerUnavailable { .. } => "worker_unavailable",
        }
    }
}

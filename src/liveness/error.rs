use crate::upstream::TransportError;

/// A failed liveness probe. Either variant evicts the worker.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected probe reply {0:?}")]
    UnexpectedReply(String),
}

// Outbound calls made by workers and clients to the coordinator.

use bytes::Bytes;
use hyper::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::backend_hyper_impl::make_request;
use super::TransportError;
use crate::http::client::{base_url, HyperClient};
use crate::model::{
    MatrixRequest, MatrixResponse, RegisterRequest, RegisterResponse, WorkerSnapshot,
};

pub const REGISTER_PATH: &str = "/coordinator/register";
pub const COMPUTE_PATH: &str = "/coordinator/compute";
pub const WORKERS_PATH: &str = "/coordinator/workers";

/// Failure of a coordinator call as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The coordinator could not place the computation (no or unreachable workers).
    #[error("coordinator rejected the computation: {0}")]
    Unavailable(String),
}

/// Thin client for the coordinator API.
pub struct CoordinatorClient {
    client: HyperClient,
    address: String,
    timeout: Duration,
}

impl CoordinatorClient {
    pub fn new(client: HyperClient, address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            address: address.into(),
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Announces a worker address and returns the acknowledgement text.
    pub async fn register(&self, worker_address: &str) -> Result<String, CoordinatorError> {
        let req = RegisterRequest {
            address: worker_address.to_string(),
        };
        let (status, body) = self.send(Method::POST, REGISTER_PATH, Some(&req)).await?;
        ensure_success(&self.address, status)?;
        let resp: RegisterResponse = decode(&self.address, &body)?;
        Ok(resp.message)
    }

    /// Submits one computation.
    ///
    /// Validation failures come back as `Ok` with the error field set;
    /// placement failures surface as [`CoordinatorError::Unavailable`].
    pub async fn compute(&self, req: &MatrixRequest) -> Result<MatrixResponse, CoordinatorError> {
        let (status, body) = self.send(Method::POST, COMPUTE_PATH, Some(req)).await?;
        if status == 503 {
            let resp: MatrixResponse = decode(&self.address, &body)?;
            return Err(CoordinatorError::Unavailable(resp.error));
        }
        ensure_success(&self.address, status)?;
        decode(&self.address, &body).map_err(Into::into)
    }

    /// Current registry contents.
    pub async fn workers(&self) -> Result<Vec<WorkerSnapshot>, CoordinatorError> {
        let (status, body) = self
            .send::<()>(Method::GET, WORKERS_PATH, None)
            .await?;
        ensure_success(&self.address, status)?;
        decode(&self.address, &body).map_err(Into::into)
    }

    async fn send<T: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<(u16, Bytes), TransportError> {
        let payload = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| TransportError::Call {
                addr: self.address.clone(),
                reason: format!("failed to encode request: {}", e),
            })?
            .map(Bytes::from);

        let uri = format!("{}{}", base_url(&self.address), path);
        make_request(&self.client, method, &self.address, &uri, payload, self.timeout).await
    }
}

fn ensure_success(addr: &str, status: u16) -> Result<(), TransportError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(TransportError::Status {
            addr: addr.to_string(),
            status,
        })
    }
}

fn decode<T: DeserializeOwned>(addr: &str, body: &[u8]) -> Result<T, TransportError> {
    serde_json::from_slice(body).map_err(|e| TransportError::Decode {
        addr: addr.to_string(),
        reason: e.to_string(),
    })
}

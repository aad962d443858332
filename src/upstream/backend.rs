use bytes::Bytes;
use hyper::Method;
use std::time::Duration;
use tracing::debug;

use super::backend_hyper_impl::make_request;
use super::{TransportError, WorkerClient};
use crate::http::client::{base_url, HyperClient};
use crate::model::{MatrixRequest, MatrixResponse};

pub const WORKER_PING_PATH: &str = "/worker/ping";
pub const WORKER_COMPUTE_PATH: &str = "/worker/compute";

/// HTTP implementation of [`WorkerClient`].
pub struct BackendImpl {
    client: HyperClient,
    call_timeout: Duration,
    probe_timeout: Duration,
}

impl BackendImpl {
    pub fn new(client: HyperClient, call_timeout: Duration, probe_timeout: Duration) -> Self {
        Self {
            client,
            call_timeout,
            probe_timeout,
        }
    }
}

#[async_trait::async_trait]
impl WorkerClient for BackendImpl {
    async fn ping(&self, address: &str) -> Result<String, TransportError> {
        let uri = format!("{}{}", base_url(address), WORKER_PING_PATH);
        let (status, body) =
            make_request(&self.client, Method::GET, address, &uri, None, self.probe_timeout).await?;
        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                addr: address.to_string(),
                status,
            });
        }
        Ok(String::from_utf8_lossy(&body).trim().to_string())
    }

    async fn compute(
        &self,
        address: &str,
        req: &MatrixRequest,
    ) -> Result<MatrixResponse, TransportError> {
        let payload = serde_json::to_vec(req).map_err(|e| TransportError::Call {
            addr: address.to_string(),
            reason: format!("failed to encode request: {}", e),
        })?;

        let uri = format!("{}{}", base_url(address), WORKER_COMPUTE_PATH);
        let (status, body) = make_request(
            &self.client,
            Method::POST,
            address,
            &uri,
            Some(Bytes::from(payload)),
            self.call_timeout,
        )
        .await?;

        if !(200..300).contains(&status) {
            return Err(TransportError::Status {
                addr: address.to_string(),
                status,
            });
        }

        let resp: MatrixResponse =
            serde_json::from_slice(&body).map_err(|e| TransportError::Decode {
                addr: address.to_string(),
                reason: e.to_string(),
            })?;

        debug!(
            component = "upstream",
            event = "compute_answered",
            worker = address,
            is_error = resp.is_error(),
            "worker answered"
        );
        Ok(resp)
    }
}

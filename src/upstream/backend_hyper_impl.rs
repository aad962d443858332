//! Hyper-based request execution with transport error classification.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::{header, Method, Request, Uri};
use std::time::Duration;
use tokio::time::timeout;

use crate::http::client::HyperClient;

use super::TransportError;

/// Sends one request and returns the status with the fully read body.
///
/// Connection failures map to [`TransportError::Connect`], everything after a
/// connection was attempted maps to `Call`/`Timeout`. The status code is not
/// interpreted here.
pub async fn make_request(
    client: &HyperClient,
    method: Method,
    addr: &str,
    uri: &str,
    body: Option<Bytes>,
    timeout_duration: Duration,
) -> Result<(u16, Bytes), TransportError> {
    let uri = uri.parse::<Uri>().map_err(|e| TransportError::InvalidAddress {
        addr: addr.to_string(),
        reason: e.to_string(),
    })?;

    let mut builder = Request::builder().method(method).uri(uri);

    let req_body: BoxBody<Bytes, hyper::Error> = match body {
        Some(bytes) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Full::new(bytes)
                .map_err(|never: std::convert::Infallible| match never {})
                .boxed()
        }
        None => Empty::<Bytes>::new()
            .map_err(|never: std::convert::Infallible| match never {})
            .boxed(),
    };

    let req = builder.body(req_body).map_err(|e| TransportError::Call {
        addr: addr.to_string(),
        reason: e.to_string(),
    })?;

    let exchange = async {
        let response = client.request(req).await.map_err(|e| {
            if e.is_connect() {
                TransportError::Connect {
                    addr: addr.to_string(),
                    reason: e.to_string(),
                }
            } else {
                TransportError::Call {
                    addr: addr.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| TransportError::Call {
                addr: addr.to_string(),
                reason: format!("failed to read response body: {}", e),
            })?
            .to_bytes();

        Ok::<_, TransportError>((status, body))
    };

    match timeout(timeout_duration, exchange).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                component = "upstream",
                event = "request_timeout",
                addr = addr,
                timeout = ?timeout_duration,
                "Request timed out"
            );
            Err(TransportError::Timeout {
                addr: addr.to_string(),
                timeout: timeout_duration,
            })
        }
    }
}

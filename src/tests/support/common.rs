// Common test utilities for integration tests.

use std::future::Future;
use std::time::Duration;

use crate::model::{Matrix, MatrixRequest, MatrixResponse, WorkerSnapshot};

/// Shared reqwest client with a bounded timeout.
pub fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("reqwest client")
}

/// Posts a computation to the coordinator and decodes the reply.
pub async fn compute(coordinator: &str, req: &MatrixRequest) -> (u16, MatrixResponse) {
    let resp = http()
        .post(format!("http://{}/coordinator/compute", coordinator))
        .json(req)
        .send()
        .await
        .expect("compute request");
    let status = resp.status().as_u16();
    let body = resp.json::<MatrixResponse>().await.expect("compute body");
    (status, body)
}

/// Fetches the registry snapshot.
pub async fn workers(coordinator: &str) -> Vec<WorkerSnapshot> {
    http()
        .get(format!("http://{}/coordinator/workers", coordinator))
        .send()
        .await
        .expect("workers request")
        .json()
        .await
        .expect("workers body")
}

pub async fn worker_addresses(coordinator: &str) -> Vec<String> {
    workers(coordinator)
        .await
        .into_iter()
        .map(|w| w.address)
        .collect()
}

/// Registers an arbitrary address, as a worker would.
pub async fn register(coordinator: &str, address: &str) -> reqwest::Response {
    http()
        .post(format!("http://{}/coordinator/register", coordinator))
        .json(&serde_json::json!({ "address": address }))
        .send()
        .await
        .expect("register request")
}

/// Polls `check` until it holds or `timeout` elapses. Returns the last verdict.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

pub fn m(rows: Vec<Vec<i64>>) -> Matrix {
    Matrix::from_rows(rows)
}

/// An address nothing listens on.
pub async fn dead_addr() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    addr.to_string()
}

//! Tests for the worker-facing backend: address normalization, transport
//! error classification and reply decoding against a throwaway axum server.

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::net::SocketAddr;
use std::time::Duration;

use super::{BackendImpl, TransportError, WorkerClient};
use crate::http::client::{base_url, create_client};
use crate::model::{Matrix, MatrixRequest, MatrixResponse};

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

fn backend(timeout: Duration) -> BackendImpl {
    BackendImpl::new(create_client(), timeout, timeout)
}

#[test]
fn test_base_url_normalization() {
    assert_eq!(base_url("127.0.0.1:5001"), "http://127.0.0.1:5001");
    assert_eq!(base_url("localhost:5001"), "http://127.0.0.1:5001");
    assert_eq!(base_url("http://10.0.0.7:5001/"), "http://10.0.0.7:5001");
    assert_eq!(base_url("worker-a:7000"), "http://worker-a:7000");
}

#[tokio::test]
async fn test_ping_returns_trimmed_token() {
    let addr = serve(Router::new().route("/worker/ping", get(|| async { "pong\n" }))).await;

    let reply = backend(Duration::from_secs(2))
        .ping(&addr.to_string())
        .await
        .unwrap();
    assert_eq!(reply, "pong");
}

#[tokio::test]
async fn test_ping_refused_connection_is_dial_error() {
    let addr = closed_port().await;

    let err = backend(Duration::from_secs(2))
        .ping(&addr.to_string())
        .await
        .unwrap_err();
    assert!(err.is_dial(), "expected dial failure, got {err:?}");
}

#[tokio::test]
async fn test_compute_decodes_worker_reply() {
    let router = Router::new().route(
        "/worker/compute",
        post(|Json(req): Json<MatrixRequest>| async move { Json(MatrixResponse::ok(req.mat1)) }),
    );
    let addr = serve(router).await;

    let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
    let resp = backend(Duration::from_secs(2))
        .compute(&addr.to_string(), &MatrixRequest::transpose(m.clone()))
        .await
        .unwrap();
    assert!(!resp.is_error());
    assert_eq!(resp.result, m);
}

#[tokio::test]
async fn test_compute_non_success_status_is_call_failure() {
    let router = Router::new().route(
        "/worker/compute",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve(router).await;

    let m = Matrix::from_rows(vec![vec![1]]);
    let err = backend(Duration::from_secs(2))
        .compute(&addr.to_string(), &MatrixRequest::transpose(m))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Status { status: 500, .. }));
    assert!(!err.is_dial());
}

#[tokio::test]
async fn test_compute_garbage_reply_is_decode_failure() {
    let router = Router::new().route("/worker/compute", post(|| async { "not json" }));
    let addr = serve(router).await;

    let m = Matrix::from_rows(vec![vec![1]]);
    let err = backend(Duration::from_secs(2))
        .compute(&addr.to_string(), &MatrixRequest::transpose(m))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode { .. }));
}

#[tokio::test]
async fn test_compute_reply_without_fields_is_decode_failure() {
    let router = Router::new().route("/worker/compute", post(|| async { Json(serde_json::json!({})) }));
    let addr = serve(router).await;

    let m = Matrix::from_rows(vec![vec![1]]);
    let err = backend(Duration::from_secs(2))
        .compute(&addr.to_string(), &MatrixRequest::transpose(m))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode { .. }));
}

#[tokio::test]
async fn test_compute_slow_worker_times_out() {
    let router = Router::new().route(
        "/worker/compute",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let addr = serve(router).await;

    let m = Matrix::from_rows(vec![vec![1]]);
    let err = backend(Duration::from_millis(100))
        .compute(&addr.to_string(), &MatrixRequest::transpose(m))
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Timeout { .. }));
}

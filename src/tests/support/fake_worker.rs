// Scriptable stand-in for a worker, for failure paths a real worker never takes.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::model::MatrixRequest;
use crate::ops;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingMode {
    Pong,
    WrongToken,
    ServerError,
}

/// Answers pings per `PingMode`; compute either executes or fails with 500.
pub struct FakeWorker {
    addr: String,
    compute_calls: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl FakeWorker {
    pub async fn start(ping: PingMode, compute_ok: bool) -> Self {
        let compute_calls = Arc::new(AtomicUsize::new(0));
        let calls = Arc::clone(&compute_calls);

        let router = Router::new()
            .route(
                "/worker/ping",
                get(move || async move {
                    match ping {
                        PingMode::Pong => (StatusCode::OK, "pong").into_response(),
                        PingMode::WrongToken => (StatusCode::OK, "ping").into_response(),
                        PingMode::ServerError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                    }
                }),
            )
            .route(
                "/worker/compute",
                post(move |Json(req): Json<MatrixRequest>| {
                    let calls = Arc::clone(&calls);
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        if compute_ok {
                            Json(ops::respond(&req)).into_response()
                        } else {
                            StatusCode::INTERNAL_SERVER_ERROR.into_response()
                        }
                    }
                }),
            );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("fake worker binds");
        let addr = listener.local_addr().expect("local addr").to_string();
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Self {
            addr,
            compute_calls,
            handle,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn compute_calls(&self) -> usize {
        self.compute_calls.load(Ordering::SeqCst)
    }
}

impl Drop for FakeWorker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

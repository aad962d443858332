//! Client-facing compute endpoint of the coordinator.

use axum::{body::Bytes, http::StatusCode, routing::post, Json, Router};
use std::sync::Arc;
use tracing::{debug, error};

use crate::dispatch::Dispatcher;
use crate::http::Controller;
use crate::model::{MatrixRequest, MatrixResponse};
use crate::upstream::coordinator::COMPUTE_PATH;

/// Accepts a computation and places it on a worker.
///
/// Worker answers (including validation errors) are 200; placement failures
/// are 503 with the reason in `error`.
#[derive(Clone)]
pub struct ComputeController {
    dispatcher: Arc<Dispatcher>,
}

impl ComputeController {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    async fn handle_compute(&self, body: Bytes) -> (StatusCode, Json<MatrixResponse>) {
        let req: MatrixRequest = match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => {
                debug!(
                    component = "coordinator",
                    event = "malformed_request",
                    error = %e,
                    "request body could not be decoded"
                );
                return (
                    StatusCode::OK,
                    Json(MatrixResponse::failed(format!("malformed request: {}", e))),
                );
            }
        };

        // The dispatch owns a reservation; run it detached so a client that
        // hangs up cannot cancel it halfway and skip the worker's answer.
        let dispatcher = Arc::clone(&self.dispatcher);
        let task = tokio::spawn(async move { dispatcher.dispatch(&req).await });

        match task.await {
            Ok(Ok(resp)) => (StatusCode::OK, Json(resp)),
            Ok(Err(err)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(MatrixResponse::failed(err.to_string())),
            ),
            Err(join_err) => {
                error!(
                    component = "coordinator",
                    event = "dispatch_task_failed",
                    error = %join_err,
                    "dispatch task did not complete"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MatrixResponse::failed("internal error")),
                )
            }
        }
    }
}

impl Controller for ComputeController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        router.route(
            COMPUTE_PATH,
            post(move |body: Bytes| {
                let controller = controller.clone();
                async move { controller.handle_compute(body).await }
            }),
        )
    }
}

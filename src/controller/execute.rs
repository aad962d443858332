//! Worker-side compute endpoint.

use axum::{body::Bytes, routing::post, Json, Router};
use tracing::{debug, error};

use crate::http::Controller;
use crate::metrics;
use crate::model::{MatrixRequest, MatrixResponse};
use crate::ops;
use crate::upstream::backend::WORKER_COMPUTE_PATH;

/// Executes one dispatched operation. Every outcome, including an
/// undecodable body, is a 200 with the problem in `error`.
pub struct ExecuteController;

impl ExecuteController {
    pub fn new() -> Self {
        Self
    }

    async fn handle_execute(body: Bytes) -> Json<MatrixResponse> {
        let req: MatrixRequest = match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => {
                metrics::inc_computed("", false);
                return Json(MatrixResponse::failed(format!("malformed request: {}", e)));
            }
        };

        // Kernels are CPU bound, keep them off the async workers.
        let operation = req.operation.clone();
        let resp = match tokio::task::spawn_blocking(move || ops::respond(&req)).await {
            Ok(resp) => resp,
            Err(e) => {
                error!(
                    component = "worker",
                    event = "compute_aborted",
                    operation = %operation,
                    error = %e,
                    "kernel task did not complete"
                );
                MatrixResponse::failed(format!("computation aborted: {}", e))
            }
        };

        metrics::inc_computed(&operation, !resp.is_error());
        debug!(
            component = "worker",
            event = "computed",
            operation = %operation,
            error = %resp.error,
            "operation executed"
        );
        Json(resp)
    }
}

impl Default for ExecuteController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for ExecuteController {
    fn add_route(&self, router: Router) -> Router {
        router.route(WORKER_COMPUTE_PATH, post(Self::handle_execute))
    }
}

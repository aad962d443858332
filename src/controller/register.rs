//! Worker registration endpoint.

use axum::{body::Bytes, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use std::sync::Arc;
use tracing::warn;

use crate::http::Controller;
use crate::model::{RegisterRequest, RegisterResponse};
use crate::pool::WorkerPool;
use crate::upstream::coordinator::REGISTER_PATH;

/// Adds announcing workers to the pool.
#[derive(Clone)]
pub struct RegisterController {
    pool: Arc<WorkerPool>,
}

impl RegisterController {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool }
    }

    async fn handle_register(&self, body: Bytes) -> impl IntoResponse {
        let req: RegisterRequest = match serde_json::from_slice(&body) {
            Ok(req) => req,
            Err(e) => return bad_request(format!("malformed registration: {}", e)),
        };

        let address = req.address.trim();
        if address.is_empty() {
            return bad_request("malformed registration: empty address".to_string());
        }

        let message = self.pool.register(address);
        (
            StatusCode::OK,
            Json(RegisterResponse {
                message: message.to_string(),
            }),
        )
    }
}

fn bad_request(message: String) -> (StatusCode, Json<RegisterResponse>) {
    warn!(
        component = "coordinator",
        event = "registration_rejected",
        reason = %message,
        "rejected worker registration"
    );
    (StatusCode::BAD_REQUEST, Json(RegisterResponse { message }))
}

impl Controller for RegisterController {
    fn add_route(&self, router: Router) -> Router {
        let controller = Arc::new(self.clone());
        router.route(
            REGISTER_PATH,
            post(move |body: Bytes| {
                let controller = controller.clone();
                async move { controller.handle_register(body).await }
            }),
        )
    }
}

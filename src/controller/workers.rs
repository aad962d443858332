//! Read-only view of the worker pool.

use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::http::Controller;
use crate::pool::WorkerPool;
use crate::upstream::coordinator::WORKERS_PATH;

#[derive(Clone)]
pub struct WorkersController {
    pool: Arc<WorkerPool>,
}

impl WorkersController {
    pub fn new(pool: Arc<WorkerPool>) -> Self {
        Self { pool }
    }
}

impl Controller for WorkersController {
    fn add_route(&self, router: Router) -> Router {
        let pool = Arc::clone(&self.pool);
        router.route(
            WORKERS_PATH,
            get(move || {
                let pool = pool.clone();
                async move { Json(pool.snapshot()) }
            }),
        )
    }
}

// Liveness endpoint probed by the coordinator.

use axum::{routing::get, Router};

use crate::http::Controller;
use crate::model::PING_REPLY;
use crate::upstream::backend::WORKER_PING_PATH;

pub struct PingController;

impl PingController {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PingController {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller for PingController {
    fn add_route(&self, router: Router) -> Router {
        router.route(WORKER_PING_PATH, get(|| async { PING_REPLY }))
    }
}

//! Panic recovery middleware.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::metrics;

/// Turns a panicking handler into a 500 instead of a dropped connection.
pub struct PanicRecoverMiddleware;

impl PanicRecoverMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PanicRecoverMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    metrics::inc_panics();
    error!(
        component = "server",
        event = "panic_recovered",
        panic = %detail,
        "handler panicked"
    );

    (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
}

impl crate::middleware::Middleware for PanicRecoverMiddleware {
    fn apply(&self, router: axum::Router) -> axum::Router {
        router.layer(CatchPanicLayer::custom(handle_panic))
    }
}

//! HTTP server implementation.

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info};

use crate::controller::Controller;
use crate::middleware::Middleware;

/// A bound axum server. Binding and serving are split so callers can learn
/// the actual address (port 0) before the first request arrives.
pub struct HttpServer {
    name: &'static str,
    shutdown_token: CancellationToken,
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
}

impl HttpServer {
    /// Binds the listener and assembles the router. Bind failure is fatal
    /// for the caller.
    pub async fn bind(
        name: &'static str,
        addr: &str,
        shutdown_token: CancellationToken,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
        request_timeout: Duration,
    ) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {} listener on {}", name, addr))?;
        let local_addr = listener
            .local_addr()
            .context("failed to read bound address")?;

        let router = Self::build_router(controllers);
        let router = Self::merge_middlewares(router, middlewares, request_timeout);

        Ok(Self {
            name,
            shutdown_token,
            listener,
            local_addr,
            router,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until the shutdown token is cancelled.
    pub async fn listen_and_serve(self) -> Result<()> {
        let Self {
            name,
            shutdown_token,
            listener,
            local_addr,
            router,
        } = self;

        info!(
            component = "server",
            event = "started",
            name = name,
            addr = %local_addr,
            "server started"
        );

        let serve_future = axum::serve(listener, router).with_graceful_shutdown(async move {
            shutdown_token.cancelled().await;
        });

        if let Err(e) = serve_future.await {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                name = name,
                addr = %local_addr,
                error = %e,
                "server failed to listen and serve"
            );
            return Err(e.into());
        }

        info!(
            component = "server",
            event = "stopped",
            name = name,
            addr = %local_addr,
            "server stopped"
        );

        Ok(())
    }

    fn build_router(controllers: Vec<Box<dyn Controller>>) -> Router {
        let mut router = Router::new();
        for controller in controllers {
            router = controller.add_route(router);
        }
        router
    }

    fn merge_middlewares(
        router: Router,
        middlewares: Vec<Box<dyn Middleware>>,
        request_timeout: Duration,
    ) -> Router {
        let mut result = router;

        // Apply middlewares in reverse order (last middleware wraps first)
        for middleware in middlewares.iter().rev() {
            result = middleware.apply(result);
        }

        result.layer(TimeoutLayer::new(request_timeout))
    }
}

//! Hyper HTTP client shared by every outbound call.
//!
//! One pooled client per process:
//! - Max idle connections per host: 64
//! - Max idle connection duration: 30s
//! - Connection timeout: 3s
//! - TCP keep-alive: 30s
//! - TCP_NODELAY: enabled

use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper_util::client::legacy::connect::dns::GaiResolver;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;

pub const CONNS_PER_HOST: usize = 64;
pub const MAX_IDLE_CONN_DURATION: Duration = Duration::from_secs(30);
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

pub type HyperClient = Client<HttpConnector<GaiResolver>, BoxBody<Bytes, hyper::Error>>;

/// Creates the pooled plain-HTTP client.
pub fn create_client() -> HyperClient {
    let mut http_connector = HttpConnector::new_with_resolver(GaiResolver::new());
    http_connector.set_nodelay(true);
    http_connector.set_keepalive(Some(Duration::from_secs(30)));
    http_connector.set_connect_timeout(Some(CONNECT_TIMEOUT));

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(MAX_IDLE_CONN_DURATION)
        .pool_max_idle_per_host(CONNS_PER_HOST)
        .build(http_connector)
}

/// Turns a bare `host:port` into a base URL; `http://` URLs pass through.
pub fn base_url(address: &str) -> String {
    let address = address.trim_end_matches('/');
    if address.starts_with("http://") {
        return address.to_string();
    }
    let normalized = if address == "localhost" || address.starts_with("localhost:") {
        address.replacen("localhost", "127.0.0.1", 1)
    } else {
        address.to_string()
    };
    format!("http://{}", normalized)
}

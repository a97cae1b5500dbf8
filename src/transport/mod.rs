//! Transport layer for the proxy.
//!
//! The proxy is served over HTTP; [`routes`] maps requests onto a
//! [`DocumentProxy`](crate::db::DocumentProxy) and [`http`] runs the server.

pub mod http;
pub mod routes;

pub use http::HttpTransport;
pub use routes::router;

use crate::error::ProxyResult;
use std::future::Future;

/// Trait for proxy transport implementations.
pub trait Transport: Send + Sync {
    /// Start the transport and begin handling requests.
    ///
    /// This method should block until the transport is shut down.
    fn run(&self) -> impl Future<Output = ProxyResult<()>> + Send;

    /// Get the name of this transport for logging.
    fn name(&self) -> &'static str;
}

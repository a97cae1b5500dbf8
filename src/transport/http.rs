//! HTTP transport for the proxy.
//!
//! Serves the routes from [`super::routes`] with graceful shutdown on SIGINT
//! or SIGTERM.

use crate::db::DocumentProxy;
use crate::error::{ProxyError, ProxyResult};
use crate::transport::{Transport, routes};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{error, info, warn};

/// How long in-flight requests get to finish after the first signal.
const GRACEFUL_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport over any [`DocumentProxy`].
pub struct HttpTransport<P: DocumentProxy> {
    proxy: Arc<P>,
    host: String,
    port: u16,
}

impl<P: DocumentProxy> HttpTransport<P> {
    /// Serve `proxy` on `host:port`.
    pub fn new(proxy: Arc<P>, host: impl Into<String>, port: u16) -> Self {
        Self {
            proxy,
            host: host.into(),
            port,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl<P: DocumentProxy> Transport for HttpTransport<P> {
    async fn run(&self) -> ProxyResult<()> {
        let addr = self.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ProxyError::internal(format!("Failed to bind to {}: {}", addr, e)))?;
        info!(
            endpoint = %self.proxy.endpoint(),
            "MongoDB proxy listening on {}", addr
        );

        let (draining_tx, draining_rx) = oneshot::channel::<()>();
        let serve = axum::serve(listener, routes::router(self.proxy.clone()))
            .with_graceful_shutdown(async move {
                let signal = next_signal().await;
                info!(signal, "Shutdown requested");
                let _ = draining_tx.send(());
            });

        // In-flight requests may be stuck on a slow engine; stop waiting for
        // them after the grace period or a second signal.
        tokio::select! {
            result = serve => match result {
                Ok(()) => info!("HTTP server stopped"),
                Err(e) => {
                    error!(error = %e, "HTTP server failed");
                    return Err(ProxyError::internal(format!("HTTP server failed: {}", e)));
                }
            },
            _ = drain_deadline(draining_rx) => {}
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Resolves once shutdown has started and draining should be cut short.
async fn drain_deadline(draining: oneshot::Receiver<()>) {
    if draining.await.is_err() {
        // Server finished without a signal; never cut it short.
        std::future::pending::<()>().await;
    }
    info!(
        grace_secs = GRACEFUL_TIMEOUT.as_secs(),
        "Draining in-flight requests (signal again to exit now)"
    );
    tokio::select! {
        _ = tokio::time::sleep(GRACEFUL_TIMEOUT) => {
            warn!("Grace period elapsed, dropping remaining requests");
        }
        signal = next_signal() => {
            warn!(signal, "Second signal received, exiting now");
        }
    }
}

/// Wait for SIGINT or SIGTERM and return which one arrived.
async fn next_signal() -> &'static str {
    #[cfg(unix)]
    let sigterm = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = signal::ctrl_c() => "SIGINT",
        _ = sigterm => "SIGTERM",
    }
}

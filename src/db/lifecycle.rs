//! Per-request connection lifecycle.
//!
//! Every proxied operation runs inside [`ConnectionLifecycle::with_connection`]:
//! connect, run the operation, release. Release happens exactly once for every
//! connection that was opened, whether the operation succeeded, failed, timed
//! out, or panicked. A connection that never opened is never released and the
//! operation is never invoked.

use crate::config::ProxyOptions;
use crate::db::connector::Connector;
use crate::error::{ProxyError, ProxyResult};
use crate::models::{ConnectionTarget, build_uri};
use futures_util::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

/// Headroom the outer connect bound leaves the driver, so that its own
/// server selection and connect timeouts report unreachable engines first.
pub const CONNECT_GRACE: Duration = Duration::from_secs(1);

/// Opens one connection per call and guarantees it is released.
pub struct ConnectionLifecycle<C: Connector> {
    connector: C,
    uri: String,
    connect_timeout: Duration,
    operation_timeout: Duration,
}

impl<C: Connector> ConnectionLifecycle<C> {
    /// Build a lifecycle for `target`. The URI is assembled once here.
    pub fn new(connector: C, target: &ConnectionTarget, options: &ProxyOptions) -> Self {
        Self {
            connector,
            uri: build_uri(&options.scheme, target),
            connect_timeout: options.connect_timeout,
            operation_timeout: options.operation_timeout,
        }
    }

    /// Run `f` against a freshly opened connection.
    ///
    /// The operation's own result is returned unchanged. Connect failures and
    /// timeouts surface as connection errors; a panic inside `f` is re-raised
    /// after the connection has been released.
    pub async fn with_connection<F, Fut, T>(&self, operation: &'static str, f: F) -> ProxyResult<T>
    where
        F: FnOnce(C::Connection) -> Fut + Send,
        Fut: Future<Output = ProxyResult<T>> + Send,
        T: Send,
    {
        let span = info_span!("connection", operation, id = %Uuid::new_v4());
        self.run(operation, f).instrument(span).await
    }

    async fn run<F, Fut, T>(&self, operation: &'static str, f: F) -> ProxyResult<T>
    where
        F: FnOnce(C::Connection) -> Fut + Send,
        Fut: Future<Output = ProxyResult<T>> + Send,
        T: Send,
    {
        let start = Instant::now();

        let connect_limit = self.connect_timeout + CONNECT_GRACE;
        let connection = match timeout(connect_limit, self.connector.connect(&self.uri)).await {
            Ok(Ok(connection)) => connection,
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to connect");
                return Err(e);
            }
            Err(_) => {
                warn!(
                    timeout_ms = connect_limit.as_millis() as u64,
                    "Timed out connecting"
                );
                return Err(ProxyError::timeout("connect", connect_limit));
            }
        };
        debug!(elapsed_ms = start.elapsed().as_millis() as u64, "Connected");

        let handle = connection.clone();
        let operation_timeout = self.operation_timeout;
        let outcome = AssertUnwindSafe(async move { timeout(operation_timeout, f(handle)).await })
            .catch_unwind()
            .await;

        self.connector.release(connection).await;
        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Connection released"
        );

        match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                warn!(
                    timeout_ms = operation_timeout.as_millis() as u64,
                    "Operation timed out"
                );
                Err(ProxyError::timeout(operation, operation_timeout))
            }
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

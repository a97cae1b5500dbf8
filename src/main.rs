//! MongoDB Proxy - Main entry point.
//!
//! Serves insert, find, update and health operations for a MongoDB
//! deployment over HTTP.

use mongodb_proxy::config::Config;
use mongodb_proxy::db::{DbProxy, DocumentProxy};
use mongodb_proxy::transport::{HttpTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber.with(fmt::layer().json()).init();
    } else {
        subscriber
            .with(fmt::layer().with_target(true).with_thread_ids(false))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse_args();

    init_tracing(&config);

    info!("Starting MongoDB proxy v{}", env!("CARGO_PKG_VERSION"));

    let proxy = DbProxy::new(config.connection_target(), config.proxy_options());
    info!(endpoint = %proxy.endpoint(), "Database endpoint");

    info!(
        host = %config.http_host,
        port = config.http_port,
        "Using HTTP transport"
    );
    let transport = HttpTransport::new(Arc::new(proxy), &config.http_host, config.http_port);

    if let Err(e) = transport.run().await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}

//! Configuration handling for the MongoDB proxy.
//!
//! This module provides configuration management via CLI arguments and environment variables.
//! Engine settings keep the `MONGODB_*` variable names deployments already set.

use crate::models::{ConnectionTarget, DEFAULT_SCHEME};
use clap::Parser;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";
pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: i64 = 27017;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_OPERATION_TIMEOUT_SECS: u64 = 30;

/// Per-request connection settings handed to the proxy façade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOptions {
    /// URI scheme, e.g. "mongodb" or "mongodb+srv"
    pub scheme: String,
    /// Bound on establishing a connection
    pub connect_timeout: Duration,
    /// Bound on running one operation once connected
    pub operation_timeout: Duration,
}

impl Default for ProxyOptions {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            operation_timeout: Duration::from_secs(DEFAULT_OPERATION_TIMEOUT_SECS),
        }
    }
}

/// Configuration for the MongoDB proxy.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mongodb-proxy",
    about = "Stateless HTTP proxy for MongoDB insert, find, update and health operations",
    version,
    author
)]
pub struct Config {
    /// MongoDB host name
    #[arg(long, default_value = DEFAULT_DB_HOST, env = "MONGODB_HOST")]
    pub db_host: String,

    /// MongoDB port. Unset or unparsable falls back to 27017; 0 or below uses the driver default
    #[arg(long, env = "MONGODB_PORT", allow_hyphen_values = true)]
    pub db_port: Option<String>,

    /// MongoDB username (ignored unless a password is also set)
    #[arg(long, env = "MONGODB_USER")]
    pub db_user: Option<String>,

    /// MongoDB password (ignored unless a username is also set)
    #[arg(long, env = "MONGODB_PASS", hide_env_values = true)]
    pub db_pass: Option<String>,

    /// Connection URI scheme
    #[arg(long, default_value = DEFAULT_SCHEME, env = "MONGODB_SCHEME")]
    pub scheme: String,

    /// HTTP host to bind to
    #[arg(long, default_value = DEFAULT_HTTP_HOST, env = "PROXY_HTTP_HOST")]
    pub http_host: String,

    /// HTTP port to bind to
    #[arg(long, default_value_t = DEFAULT_HTTP_PORT, env = "PROXY_HTTP_PORT")]
    pub http_port: u16,

    /// Connection timeout in seconds
    #[arg(
        long,
        default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS,
        env = "PROXY_CONNECT_TIMEOUT"
    )]
    pub connect_timeout: u64,

    /// Operation timeout in seconds, applied after the connection is established
    #[arg(
        long,
        default_value_t = DEFAULT_OPERATION_TIMEOUT_SECS,
        env = "PROXY_OPERATION_TIMEOUT"
    )]
    pub operation_timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "PROXY_LOG_LEVEL")]
    pub log_level: String,

    /// Enable JSON logging format
    #[arg(long, env = "PROXY_JSON_LOGS")]
    pub json_logs: bool,
}

impl Config {
    /// Parse configuration from command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Create a default configuration (useful for testing).
    pub fn default_config() -> Self {
        Self {
            db_host: DEFAULT_DB_HOST.to_string(),
            db_port: None,
            db_user: None,
            db_pass: None,
            scheme: DEFAULT_SCHEME.to_string(),
            http_host: DEFAULT_HTTP_HOST.to_string(),
            http_port: DEFAULT_HTTP_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT_SECS,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT_SECS,
            log_level: "info".to_string(),
            json_logs: false,
        }
    }

    /// Resolve the database port, falling back to 27017 when unset or unparsable.
    pub fn resolved_db_port(&self) -> i64 {
        match self.db_port.as_deref().map(str::trim) {
            Some(raw) => match raw.parse::<i64>() {
                Ok(port) => port,
                Err(e) => {
                    warn!(
                        MONGODB_PORT = raw,
                        error = %e,
                        "Assuming default value: {}",
                        DEFAULT_DB_PORT
                    );
                    DEFAULT_DB_PORT
                }
            },
            None => {
                warn!("MONGODB_PORT not set, assuming default value: {}", DEFAULT_DB_PORT);
                DEFAULT_DB_PORT
            }
        }
    }

    /// Build the engine address from host, port and credentials.
    pub fn connection_target(&self) -> ConnectionTarget {
        ConnectionTarget {
            host: self.db_host.clone(),
            port: self.resolved_db_port(),
            username: self.db_user.clone(),
            password: self.db_pass.clone(),
        }
    }

    /// Build the per-request connection settings.
    pub fn proxy_options(&self) -> ProxyOptions {
        ProxyOptions {
            scheme: self.scheme.clone(),
            connect_timeout: self.connect_timeout_duration(),
            operation_timeout: self.operation_timeout_duration(),
        }
    }

    /// Get the connection timeout as a Duration.
    pub fn connect_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }

    /// Get the operation timeout as a Duration.
    pub fn operation_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.operation_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

//! Opening and closing engine connections.
//!
//! A [`Connector`] turns a connection URI into a live handle and tears it down
//! again. [`MongoConnector`] is the production implementation; one client is
//! created per request and shut down when the request finishes.

use crate::db::store::DocumentStore;
use crate::error::{ProxyError, ProxyResult};
use bson::doc;
use mongodb::{Client, options::ClientOptions};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Application name reported to the server for connections opened by the proxy.
pub const APP_NAME: &str = "mongodb-proxy";

/// Opens and releases connections to the storage engine.
pub trait Connector: Send + Sync + 'static {
    /// Live handle passed to operations. Clones refer to the same connection.
    type Connection: DocumentStore;

    /// Establish a connection and confirm the engine answers.
    fn connect(&self, uri: &str) -> impl Future<Output = ProxyResult<Self::Connection>> + Send;

    /// Tear the connection down. Called exactly once per successful `connect`.
    fn release(&self, connection: Self::Connection) -> impl Future<Output = ()> + Send;
}

/// Connector backed by the official MongoDB driver.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    connect_timeout: Duration,
}

impl MongoConnector {
    /// Create a connector whose driver-level connect and server selection
    /// timeouts match `connect_timeout`.
    ///
    /// The lifecycle allows [`CONNECT_GRACE`](crate::db::lifecycle::CONNECT_GRACE) on top of this, so a refused or
    /// unreachable engine fails here with a connection error, not a timeout.
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

impl Connector for MongoConnector {
    type Connection = Client;

    async fn connect(&self, uri: &str) -> ProxyResult<Client> {
        let mut options = ClientOptions::parse(uri).await.map_err(|e| {
            ProxyError::connection(
                format!("Invalid connection string: {}", e),
                "Check MONGODB_HOST, MONGODB_PORT and the credentials",
            )
        })?;
        options.connect_timeout = Some(self.connect_timeout);
        options.server_selection_timeout = Some(self.connect_timeout);
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;

        // The driver connects lazily; ping so an unreachable engine fails here.
        if let Err(e) = client.database("admin").run_command(doc! { "ping": 1 }).await {
            warn!(error = %e, "Database did not answer ping");
            client.shutdown().await;
            return Err(ProxyError::from(e).into_connectivity());
        }

        debug!("Database answered ping");
        Ok(client)
    }

    async fn release(&self, connection: Client) {
        connection.shutdown().await;
    }
}

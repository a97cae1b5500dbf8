//! The façade the transport layer talks to.
//!
//! [`DocumentProxy`] hides connection handling entirely: each call validates
//! its input, opens a connection through [`ConnectionLifecycle`], runs one
//! operation and releases the connection before returning.

use crate::config::ProxyOptions;
use crate::db::connector::{Connector, MongoConnector};
use crate::db::lifecycle::ConnectionLifecycle;
use crate::error::ProxyResult;
use crate::models::{
    ConnectionTarget, FindRequest, FindResult, HealthResult, InsertRequest, InsertResult,
    Namespace, UpdateRequest, UpdateResult,
};
use crate::operations::{find, health, insert, update};
use std::future::Future;
use tracing::info;

/// Stateless document operations against a single engine.
pub trait DocumentProxy: Send + Sync + 'static {
    /// Insert one document into `database.collection`.
    fn insert(
        &self,
        database: &str,
        collection: &str,
        request: InsertRequest,
    ) -> impl Future<Output = ProxyResult<InsertResult>> + Send;

    /// Return all documents matching the filter.
    fn find(
        &self,
        database: &str,
        collection: &str,
        request: FindRequest,
    ) -> impl Future<Output = ProxyResult<FindResult>> + Send;

    /// Update all documents matching the filter.
    fn update(
        &self,
        database: &str,
        collection: &str,
        request: UpdateRequest,
    ) -> impl Future<Output = ProxyResult<UpdateResult>> + Send;

    /// List database names. Fails with a connection error when the engine is
    /// unreachable; never reports success with an empty list in that case.
    fn health_check(&self) -> impl Future<Output = ProxyResult<HealthResult>> + Send;

    /// Connection URI with the password masked, for logs.
    fn endpoint(&self) -> String;
}

/// Production proxy: one connection per call.
pub struct DbProxy<C: Connector = MongoConnector> {
    lifecycle: ConnectionLifecycle<C>,
    target: ConnectionTarget,
    scheme: String,
}

impl DbProxy<MongoConnector> {
    /// Create a proxy backed by the MongoDB driver.
    pub fn new(target: ConnectionTarget, options: ProxyOptions) -> Self {
        let connector = MongoConnector::new(options.connect_timeout);
        Self::with_connector(connector, target, options)
    }
}

impl<C: Connector> DbProxy<C> {
    /// Create a proxy over any connector.
    pub fn with_connector(connector: C, target: ConnectionTarget, options: ProxyOptions) -> Self {
        let lifecycle = ConnectionLifecycle::new(connector, &target, &options);
        info!(
            endpoint = %target.masked_uri(&options.scheme),
            connect_timeout_secs = options.connect_timeout.as_secs(),
            operation_timeout_secs = options.operation_timeout.as_secs(),
            "Proxy configured"
        );
        Self {
            lifecycle,
            target,
            scheme: options.scheme,
        }
    }
}

impl<C: Connector> DocumentProxy for DbProxy<C> {
    async fn insert(
        &self,
        database: &str,
        collection: &str,
        request: InsertRequest,
    ) -> ProxyResult<InsertResult> {
        let ns = Namespace::new(database, collection)?;
        let document = insert::decode(request)?;

        self.lifecycle
            .with_connection("insert", move |store| async move {
                insert::execute(&store, &ns, document).await
            })
            .await
    }

    async fn find(
        &self,
        database: &str,
        collection: &str,
        request: FindRequest,
    ) -> ProxyResult<FindResult> {
        let ns = Namespace::new(database, collection)?;
        let filter = find::decode(request)?;

        self.lifecycle
            .with_connection("find", move |store| async move {
                find::execute(&store, &ns, filter).await
            })
            .await
    }

    async fn update(
        &self,
        database: &str,
        collection: &str,
        request: UpdateRequest,
    ) -> ProxyResult<UpdateResult> {
        let ns = Namespace::new(database, collection)?;
        let command = update::decode(request)?;

        self.lifecycle
            .with_connection("update", move |store| async move {
                update::execute(&store, &ns, command).await
            })
            .await
    }

    async fn health_check(&self) -> ProxyResult<HealthResult> {
        self.lifecycle
            .with_connection("health_check", |store| async move {
                health::execute(&store).await
            })
            .await
            .map_err(|e| e.into_connectivity())
    }

    fn endpoint(&self) -> String {
        self.target.masked_uri(&self.scheme)
    }
}

//! Database abstraction layer.
//!
//! This module provides database access functionality:
//! - Connectors that open and release engine connections
//! - The storage calls each operation needs
//! - The per-request connection lifecycle
//! - The proxy façade used by the transport layer

pub mod connector;
pub mod lifecycle;
pub mod proxy;
pub mod store;

pub use connector::{Connector, MongoConnector};
pub use lifecycle::ConnectionLifecycle;
pub use proxy::{DbProxy, DocumentProxy};
pub use store::{DocumentStore, UpdateOutcome};

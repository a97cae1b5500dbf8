//! Operation translators.
//!
//! Each operation has a synchronous `decode` step that turns caller JSON into
//! native documents, and an async `execute` step that runs against a
//! [`DocumentStore`](crate::db::store::DocumentStore). Decoding never touches
//! the network, so malformed requests are rejected before a connection opens.

pub mod convert;
pub mod find;
pub mod health;
pub mod insert;
pub mod update;

pub use update::UpdateCommand;

//! Data models for the MongoDB proxy.
//!
//! This module re-exports all model types used throughout the application.

pub mod connection;
pub mod operation;

// Re-export commonly used types
pub use connection::{ConnectionTarget, DEFAULT_SCHEME, build_uri, sanitize_credential};
pub use operation::{
    FindRequest, FindResult, HealthResult, HomeResponse, InsertRequest, InsertResult, Namespace,
    UpdateRequest, UpdateResult,
};

//! MongoDB Proxy Library
//!
//! A stateless HTTP proxy that exposes insert, find, update and health
//! operations on a MongoDB deployment. Every request opens its own connection
//! and releases it before the response is sent.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod operations;
pub mod transport;

pub use config::{Config, ProxyOptions};
pub use db::{DbProxy, DocumentProxy};
pub use error::{ProxyError, ProxyResult};

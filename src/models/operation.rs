//! Request and result models for the proxy operations.
//!
//! Requests carry caller JSON untouched; translation into native documents
//! happens in [`crate::operations`]. Results are what the transport serializes.

use crate::error::{ProxyError, ProxyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::fmt;

/// A `database.collection` pair taken from the request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    database: String,
    collection: String,
}

impl Namespace {
    /// Validate and build a namespace. Blank names are malformed requests.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> ProxyResult<Self> {
        let database = database.into();
        let collection = collection.into();

        if database.trim().is_empty() {
            return Err(ProxyError::malformed("Missing database name"));
        }
        if collection.trim().is_empty() {
            return Err(ProxyError::malformed("Missing collection name"));
        }
        if database.contains('\0') || collection.contains('\0') {
            return Err(ProxyError::malformed(
                "Database and collection names cannot contain NUL characters",
            ));
        }

        Ok(Self {
            database,
            collection,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// A single document to insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InsertRequest {
    pub document: JsonValue,
}

impl InsertRequest {
    pub fn new(document: JsonValue) -> Self {
        Self { document }
    }

    /// Decode a raw request body. An empty body is malformed.
    pub fn from_body(body: &[u8]) -> ProxyResult<Self> {
        if is_blank(body) {
            return Err(ProxyError::malformed("Request body is empty"));
        }
        Ok(Self::new(serde_json::from_slice(body)?))
    }
}

/// A query filter. `None` matches every document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FindRequest {
    pub filter: Option<JsonValue>,
}

impl FindRequest {
    pub fn new(filter: JsonValue) -> Self {
        Self {
            filter: Some(filter),
        }
    }

    /// Match every document in the collection.
    pub fn all() -> Self {
        Self::default()
    }

    /// Decode a raw request body. An empty body matches everything.
    pub fn from_body(body: &[u8]) -> ProxyResult<Self> {
        if is_blank(body) {
            return Ok(Self::all());
        }
        Ok(Self::new(serde_json::from_slice(body)?))
    }
}

/// Filter plus the changes to apply to every matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub filter: JsonValue,
    #[serde(alias = "updates")]
    pub update: JsonValue,
    /// Insert a document built from filter and update when nothing matches
    #[serde(default)]
    pub upsert: bool,
}

impl UpdateRequest {
    pub fn new(filter: JsonValue, update: JsonValue) -> Self {
        Self {
            filter,
            update,
            upsert: false,
        }
    }

    pub fn with_upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    /// Decode a raw request body. Both `filter` and `update` are required.
    pub fn from_body(body: &[u8]) -> ProxyResult<Self> {
        if is_blank(body) {
            return Err(ProxyError::malformed("Request body is empty"));
        }
        Ok(serde_json::from_slice(body)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertResult {
    /// Engine-generated identifier; ObjectIds render as hex strings
    pub inserted_id: JsonValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindResult {
    /// Matching documents in engine order. Always an array, `[]` when nothing matches.
    pub documents: Vec<JsonValue>,
    pub count: usize,
}

impl FindResult {
    pub fn new(documents: Vec<JsonValue>) -> Self {
        let count = documents.len();
        Self { documents, count }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    pub matched_count: u64,
    /// Never exceeds `matched_count`
    pub modified_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upserted_id: Option<JsonValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResult {
    pub databases: BTreeSet<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeResponse {
    pub hello: String,
}

impl Default for HomeResponse {
    fn default() -> Self {
        Self {
            hello: "World".to_string(),
        }
    }
}

fn is_blank(body: &[u8]) -> bool {
    body.iter().all(u8::is_ascii_whitespace)
}

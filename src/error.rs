//! Error types for the MongoDB proxy.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Variants follow the three request outcomes callers care about: the engine could not
//! be reached, the request was malformed, or the engine rejected a well-formed operation.

use crate::models::Namespace;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("Timeout: {operation} exceeded {elapsed_ms}ms")]
    Timeout { operation: String, elapsed_ms: u64 },

    #[error("Malformed request: {message}")]
    MalformedRequest { message: String },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        /// Server error code, e.g. 11000 for a duplicate key
        code: Option<i32>,
        /// `database.collection` the operation targeted, when known
        namespace: Option<String>,
        suggestion: String,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ProxyError {
    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create a timeout error for an operation cut off after `limit`.
    pub fn timeout(operation: impl Into<String>, limit: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a malformed request error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest {
            message: message.into(),
        }
    }

    /// Create a storage error with an optional server error code.
    pub fn storage(
        message: impl Into<String>,
        code: Option<i32>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::Storage {
            message: message.into(),
            code,
            namespace: None,
            suggestion: suggestion.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Attach the targeted namespace to a storage error.
    pub fn in_namespace(self, ns: &Namespace) -> Self {
        match self {
            Self::Storage {
                message,
                code,
                suggestion,
                ..
            } => Self::Storage {
                message,
                code,
                namespace: Some(ns.to_string()),
                suggestion,
            },
            other => other,
        }
    }

    /// Reclassify a storage failure as a connectivity failure.
    ///
    /// Health checks report every failure as a degraded service.
    pub fn into_connectivity(self) -> Self {
        match self {
            Self::Storage {
                message,
                suggestion,
                ..
            } => Self::Connection {
                message,
                suggestion,
            },
            other => other,
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            Self::Storage { suggestion, .. } => Some(suggestion),
            Self::Timeout { .. } => {
                Some("Check that the database is up and consider raising the timeout")
            }
            _ => None,
        }
    }

    /// True for failures to reach or authenticate to the engine, timeouts included.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// Stable machine-readable code used in HTTP error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Connection { .. } => "connection_error",
            Self::Timeout { .. } => "timeout",
            Self::MalformedRequest { .. } => "malformed_request",
            Self::Storage { .. } => "storage_error",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// HTTP status the transport answers with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MalformedRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Connection { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Storage { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert driver errors to ProxyError.
impl From<mongodb::error::Error> for ProxyError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            ErrorKind::Authentication { .. } => ProxyError::connection(
                format!("Authentication failed: {}", err),
                "Check MONGODB_USER and MONGODB_PASS",
            ),
            ErrorKind::ServerSelection { .. } => ProxyError::connection(
                format!("No reachable server: {}", err),
                "Check MONGODB_HOST, MONGODB_PORT and that the database is running",
            ),
            ErrorKind::DnsResolve { .. } => ProxyError::connection(
                format!("DNS resolution failed: {}", err),
                "Check MONGODB_HOST",
            ),
            ErrorKind::Io(_) | ErrorKind::ConnectionPoolCleared { .. } => {
                ProxyError::connection(
                    format!("I/O error: {}", err),
                    "Check network connectivity and database server status",
                )
            }
            ErrorKind::Command(command_err) => ProxyError::storage(
                command_err.message.clone(),
                Some(command_err.code),
                "Check the filter and update documents",
            ),
            ErrorKind::Write(WriteFailure::WriteError(write_err)) => ProxyError::storage(
                write_err.message.clone(),
                Some(write_err.code),
                if write_err.code == 11000 {
                    "A document with the same unique key already exists"
                } else {
                    "Check the document against the collection's constraints"
                },
            ),
            _ => ProxyError::storage(
                err.to_string(),
                None,
                "Check the request and the database logs",
            ),
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(err: serde_json::Error) -> Self {
        ProxyError::malformed(format!("Invalid JSON: {}", err))
    }
}

impl From<bson::extjson::de::Error> for ProxyError {
    fn from(err: bson::extjson::de::Error) -> Self {
        ProxyError::malformed(format!("Invalid Extended JSON: {}", err))
    }
}

/// Result type alias for proxy operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(code = self.code(), error = %self, "Request failed");
        } else {
            warn!(code = self.code(), error = %self, "Request rejected");
        }

        let namespace = match &self {
            Self::Storage { namespace, .. } => namespace.as_deref(),
            _ => None,
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
                suggestion: self.suggestion(),
                namespace,
            },
        };

        (status, Json(body)).into_response()
    }
}

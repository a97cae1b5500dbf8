//! Connection-related data models.
//!
//! This module defines the engine address the proxy connects to and builds
//! connection URIs from it.

use std::fmt;
use tracing::warn;

/// Default URI scheme for the document store.
pub const DEFAULT_SCHEME: &str = "mongodb";

/// Where the proxy connects to. Built once at startup, immutable afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    /// Values <= 0 mean "engine default" and are left out of the URI
    pub port: i64,
    pub username: Option<String>,
    /// Contains sensitive data - never log
    pub password: Option<String>,
}

impl ConnectionTarget {
    /// Create a target without credentials.
    pub fn new(host: impl Into<String>, port: i64) -> Self {
        Self {
            host: host.into(),
            port,
            username: None,
            password: None,
        }
    }

    /// Attach credentials. They are only used when both are non-blank.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Username and password, if both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let username = self.username.as_deref().unwrap_or_default();
        let password = self.password.as_deref().unwrap_or_default();
        if username.trim().is_empty() || password.trim().is_empty() {
            None
        } else {
            Some((username, password))
        }
    }

    /// Build the connection URI for this target.
    pub fn uri(&self, scheme: &str) -> String {
        build_uri(scheme, self)
    }

    /// Get a display-safe version of the connection URI (password masked).
    pub fn masked_uri(&self, scheme: &str) -> String {
        match self.credentials() {
            Some((username, _)) => format!(
                "{}://{}:****@{}{}",
                scheme,
                sanitize_credential(username),
                self.host,
                port_suffix(self.port)
            ),
            None => format!("{}://{}{}", scheme, self.host, port_suffix(self.port)),
        }
    }
}

impl fmt::Debug for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// Build `scheme://[user:pass@]host[:port]`.
///
/// Credentials are dropped entirely when either one is blank; a partial
/// credential block is never emitted.
pub fn build_uri(scheme: &str, target: &ConnectionTarget) -> String {
    let credentials = match target.credentials() {
        Some((username, password)) => format!(
            "{}:{}@",
            sanitize_credential(username),
            sanitize_credential(password)
        ),
        None => {
            if target.username.is_some() || target.password.is_some() {
                warn!(
                    username_present = !target.username.as_deref().unwrap_or_default().trim().is_empty(),
                    password_present = !target.password.as_deref().unwrap_or_default().trim().is_empty(),
                    "Ignoring username/password because at least one is empty"
                );
            }
            String::new()
        }
    };

    format!(
        "{}://{}{}{}",
        scheme,
        credentials,
        target.host,
        port_suffix(target.port)
    )
}

/// Percent-encode the characters that would break the authority section.
///
/// `%` goes first so the escapes produced afterwards are not encoded twice.
pub fn sanitize_credential(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('@', "%40")
        .replace(':', "%3A")
        .replace('/', "%2F")
}

fn port_suffix(port: i64) -> String {
    if port > 0 {
        format!(":{}", port)
    } else {
        String::new()
    }
}

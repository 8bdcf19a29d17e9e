//! Error types
//!
//! Defines the error taxonomy surfaced by every script, plus the errors
//! reported by the driver and hashing collaborators.

use std::fmt;

/// Error reported by a database driver. Displays the driver's message verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Password hashing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    /// Either the plaintext or the stored hash was absent.
    #[error("data and hash arguments required")]
    MissingArguments,

    /// The hashing primitive itself failed (bad cost, worker panic, ...).
    #[error("{0}")]
    Backend(String),
}

/// Errors returned by a custom database script.
///
/// `Display` is the bare message: callers see the driver's or hasher's own
/// text, or the submitted identifier for credential failures.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("{0}")]
    Connection(DriverError),

    #[error("{0}")]
    Query(DriverError),

    /// No row matched the identifier. Message is the identifier.
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Hash(#[from] HashError),

    /// The secret did not verify. Message is the identifier.
    #[error("{0}")]
    InvalidSecret(String),

    /// The store does not support the script; message points at the management console.
    #[error("{0}")]
    Configuration(String),
}

/// Kind discriminant of a [`ScriptError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConnectionError,
    QueryError,
    NotFoundError,
    HashError,
    InvalidSecretError,
    ConfigurationError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConnectionError => "ConnectionError",
            ErrorKind::QueryError => "QueryError",
            ErrorKind::NotFoundError => "NotFoundError",
            ErrorKind::HashError => "HashError",
            ErrorKind::InvalidSecretError => "InvalidSecretError",
            ErrorKind::ConfigurationError => "ConfigurationError",
        };
        f.write_str(name)
    }
}

impl ScriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScriptError::Connection(_) => ErrorKind::ConnectionError,
            ScriptError::Query(_) => ErrorKind::QueryError,
            ScriptError::NotFound(_) => ErrorKind::NotFoundError,
            ScriptError::Hash(_) => ErrorKind::HashError,
            ScriptError::InvalidSecret(_) => ErrorKind::InvalidSecretError,
            ScriptError::Configuration(_) => ErrorKind::ConfigurationError,
        }
    }

    /// True for the two credential failures whose message is the identifier.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            ScriptError::NotFound(_) | ScriptError::InvalidSecret(_)
        )
    }
}

//! Database driver collaborator
//!
//! The scripts talk to the external store only through [`Driver`] and
//! [`Connection`]. Pooling, transport and statement semantics belong to the
//! implementation behind these traits.

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::DriverError;

pub use memory::MemoryDriver;

/// Parameters used to open a connection to the store.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    pub user: String,
    pub password: String,
    pub connect_string: String,
}

impl std::fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("connect_string", &self.connect_string)
            .finish()
    }
}

/// Opens connections to an external store.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn get_connection(
        &self,
        options: &ConnectionOptions,
    ) -> Result<Box<dyn Connection>, DriverError>;
}

/// A single open connection.
///
/// `close` takes the connection by value, so it can be released at most once.
#[async_trait]
pub trait Connection: Send {
    /// Runs one statement with positionally bound parameters.
    async fn execute(&mut self, query: &str, params: &[&str]) -> Result<QueryResult, DriverError>;

    async fn close(self: Box<Self>) -> Result<(), DriverError>;
}

/// Rows and affected-row count of a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    pub rows_affected: u64,
}

impl QueryResult {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            rows_affected: 0,
        }
    }

    pub fn affected(rows_affected: u64) -> Self {
        Self {
            rows: Vec::new(),
            rows_affected,
        }
    }
}

/// One result row keyed by upper-case column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row(BTreeMap<String, String>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<String>) -> Self {
        self.0.insert(column.to_ascii_uppercase(), value.into());
        self
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(&column.to_ascii_uppercase()).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row(iter
            .into_iter()
            .map(|(k, v)| (k.into().to_ascii_uppercase(), v.into()))
            .collect())
    }
}

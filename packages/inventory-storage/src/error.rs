//! Error types for inventory-storage

use std::fmt;
use thiserror::Error;

/// Query error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Statement could not be built or prepared
    QueryPlan,
    /// Connection or execution failure in the backing store
    Storage,
    /// Row did not have the expected shape
    RowScan,
    /// Request parameter failed validation
    InvalidParameter,
    /// Caller cancelled the operation
    Cancelled,
    /// Configuration errors
    Config,
    /// I/O errors
    IO,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::QueryPlan => "query_plan",
            ErrorKind::Storage => "storage",
            ErrorKind::RowScan => "row_scan",
            ErrorKind::InvalidParameter => "invalid_parameter",
            ErrorKind::Cancelled => "cancelled",
            ErrorKind::Config => "config",
            ErrorKind::IO => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Query error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct QueryError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl QueryError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn query_plan(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QueryPlan, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn row_scan(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RowScan, message)
    }

    pub fn invalid_parameter(name: &str, value: &str) -> Self {
        Self::new(
            ErrorKind::InvalidParameter,
            format!("Invalid {} given: {:?} is not an integer", name, value),
        )
    }

    pub fn cancelled(operation: &str) -> Self {
        Self::new(ErrorKind::Cancelled, format!("{} cancelled", operation))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    /// Whether the message is safe to show to an untrusted client
    pub fn is_client_error(&self) -> bool {
        self.kind == ErrorKind::InvalidParameter
    }
}

// SQLite error conversions
#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for QueryError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::Error as E;

        match err {
            E::InvalidColumnType(..)
            | E::InvalidColumnIndex(_)
            | E::InvalidColumnName(_)
            | E::FromSqlConversionFailure(..)
            | E::IntegralValueOutOfRange(..) => {
                QueryError::row_scan(format!("Unexpected row shape: {}", err)).with_source(err)
            }
            _ => QueryError::storage(format!("SQLite error: {}", err)).with_source(err),
        }
    }
}

impl From<serde_yaml::Error> for QueryError {
    fn from(err: serde_yaml::Error) -> Self {
        QueryError::config(format!("YAML error: {}", err)).with_source(err)
    }
}

impl From<std::io::Error> for QueryError {
    fn from(err: std::io::Error) -> Self {
        QueryError::new(ErrorKind::IO, format!("IO error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, QueryError>;

//! Error types for sqlkit.
//!
//! All fallible operations in this crate return [`Result`]. Connection errors
//! carry an actionable suggestion alongside the message so that startup
//! failures are diagnosable from the log line alone.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The configured driver string is not one of the supported dialects.
    #[error("unknown db driver {0:?}, expects mysql, postgres or sqlite")]
    UnknownDialect(String),

    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// A named handle was requested that was never registered.
    #[error("unknown db handle {name:?} (forgotten configure?)")]
    UnknownHandle { name: String },

    /// The default handle was requested but no connection was registered
    /// under the default name.
    #[error("no default db configured (forgotten configure?)")]
    UnconfiguredDefault,

    #[error("db handle {name:?} is already registered")]
    DuplicateHandle { name: String },

    /// The input passed to a write finalizer does not match the shape that
    /// operation supports.
    #[error("unsupported data shape for {operation}: {message}")]
    DataShape {
        operation: &'static str,
        message: String,
    },

    #[error("connection failed: {message}")]
    Connection { message: String, suggestion: String },

    #[error("database error: {message}")]
    Database {
        message: String,
        /// e.g. "42P01" for undefined table
        sql_state: Option<String>,
    },

    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a data shape error.
    pub fn data_shape(operation: &'static str, message: impl Into<String>) -> Self {
        Self::DataShape {
            operation,
            message: message.into(),
        }
    }

    /// Create a connection error with a helpful suggestion.
    pub fn connection(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::Connection { suggestion, .. } => Some(suggestion),
            _ => None,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => {
                Error::connection(msg.to_string(), "check the dsn format and credentials")
            }
            sqlx::Error::Database(db_err) => Error::Database {
                message: db_err.message().to_string(),
                sql_state: db_err.code().map(|c| c.to_string()),
            },
            sqlx::Error::PoolTimedOut => Error::connection(
                "connection pool acquire timed out",
                "raise max_open_conns or reduce concurrent load",
            ),
            sqlx::Error::PoolClosed => Error::connection(
                "connection pool is closed",
                "the handle was closed; re-register the connection",
            ),
            sqlx::Error::Io(io_err) => Error::connection(
                format!("i/o error: {io_err}"),
                "check network connectivity and database server status",
            ),
            sqlx::Error::Tls(tls_err) => Error::connection(
                format!("tls error: {tls_err}"),
                "verify TLS configuration and certificates",
            ),
            sqlx::Error::Protocol(msg) => Error::connection(
                format!("protocol error: {msg}"),
                "check database server compatibility",
            ),
            other => Error::internal(format!("database driver error: {other}")),
        }
    }
}

/// Result type alias for sqlkit operations.
pub type Result<T> = std::result::Result<T, Error>;

//! The closed set of supported SQL dialects.
//!
//! Every other component is parameterized over [`Dialect`]: the rebinder
//! picks placeholder syntax from it, the builder picks RETURNING behavior,
//! and the registry validates configured driver strings against it before
//! any connection is attempted.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported database dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Includes MariaDB
    MySql,
    Postgres,
    Sqlite,
}

impl Dialect {
    /// The canonical driver string for this dialect, as it appears in
    /// configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
        }
    }

    /// Sniff the dialect from a DSN's URL scheme.
    ///
    /// Used to cross-check a configured `driver` against its `dsn` at
    /// registration time; returns `None` for schemes outside the supported
    /// set.
    pub fn from_dsn(dsn: &str) -> Option<Self> {
        let lower = dsn.to_lowercase();
        if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySql)
        } else if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if lower.starts_with("sqlite://") || lower.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    /// Get the default port for this dialect.
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::MySql => Some(3306),
            Self::Postgres => Some(5432),
            Self::Sqlite => None,
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    /// Strict validation: exactly `"mysql"`, `"postgres"` or `"sqlite"`.
    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "mysql" => Ok(Self::MySql),
            "postgres" => Ok(Self::Postgres),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(Error::UnknownDialect(other.to_string())),
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

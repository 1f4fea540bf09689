//! sqlkit - multi-tenant database toolkit.
//!
//! Two halves:
//!
//! - A dynamic [`SqlBuilder`] that finalizes fluent chains into
//!   dialect-correct SQL plus an ordered bind slice, accepting tagged
//!   records, ordered rows, or homogeneous batches of either.
//! - A [`Registry`] of named, pool-tuned connection handles populated at
//!   startup and resolved concurrently afterwards, with a `"default"` alias.
//!
//! ```no_run
//! use sqlkit::{ConnectionConfig, Registry, WriteData, row};
//!
//! # async fn demo() -> sqlkit::Result<()> {
//! let registry = Registry::new();
//! let config = ConnectionConfig::new("sqlite", "sqlite:data.db");
//! registry.register("default", &config).await?;
//!
//! let db = registry.resolve(None).await?;
//! let data = row! { "name" => "alice", "age" => 30 };
//! let stmt = db.builder().table("users").to_insert(WriteData::row(&data))?;
//! db.execute(&stmt).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod clause;
pub mod config;
pub mod db;
pub mod dialect;
pub mod error;
pub mod extract;
pub mod logging;
pub mod rebind;
pub mod record;
pub mod row;
pub mod value;

pub use builder::{SqlBuilder, Statement};
pub use clause::Clause;
pub use config::{ConnectionConfig, Settings};
pub use db::{DEFAULT_NAME, Database, DbPool, Registry};
pub use dialect::Dialect;
pub use error::{Error, Result};
pub use extract::WriteData;
pub use record::Record;
pub use row::{Arg, Row};
pub use value::Value;

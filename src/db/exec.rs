//! Executing finalized statements.
//!
//! The minimal execution surface the builder targets: a statement plus its
//! positional bind slice, dispatched to the dialect-specific pool. Row
//! decoding stays an application concern.

use crate::builder::Statement;
use crate::db::bind;
use crate::db::pool::DbPool;
use crate::error::Result;
use tracing::debug;

/// Execute a write statement and return the number of affected rows.
///
/// The no-op statement (empty batch insert) executes nothing and reports
/// zero affected rows.
pub async fn execute(pool: &DbPool, stmt: &Statement) -> Result<u64> {
    if stmt.is_empty() {
        return Ok(0);
    }

    debug!(sql = %stmt.sql, binds = stmt.binds.len(), "executing statement");

    match pool {
        DbPool::MySql(p) => {
            let mut query = sqlx::query(&stmt.sql);
            for value in &stmt.binds {
                query = bind::bind_mysql(query, value);
            }
            Ok(query.execute(p).await?.rows_affected())
        }
        DbPool::Postgres(p) => {
            let mut query = sqlx::query(&stmt.sql);
            for value in &stmt.binds {
                query = bind::bind_postgres(query, value);
            }
            Ok(query.execute(p).await?.rows_affected())
        }
        DbPool::Sqlite(p) => {
            let mut query = sqlx::query(&stmt.sql);
            for value in &stmt.binds {
                query = bind::bind_sqlite(query, value);
            }
            Ok(query.execute(p).await?.rows_affected())
        }
    }
}

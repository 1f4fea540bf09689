//! Dynamic SQL statement builder.
//!
//! [`SqlBuilder`] is a per-statement accumulator: chain fluent calls to
//! describe the statement, then finalize it into a [`Statement`] with one of
//! `to_query`, `to_insert`, `to_batch_insert`, `to_update` or `to_delete`.
//! Every finalizer consumes the builder, so a statement can be finalized
//! exactly once; each logical statement gets a fresh builder.
//!
//! Statements are assembled with generic `?` placeholders and run through
//! the [rebinder](crate::rebind) for the builder's dialect as the last step,
//! so the returned SQL is always in the dialect's native placeholder syntax
//! and the bind slice order always matches placeholder order.

use crate::clause::Clause;
use crate::dialect::Dialect;
use crate::error::Result;
use crate::extract::{self, WriteData};
use crate::rebind::rebind;
use crate::value::Value;

/// A finalized statement: dialect-native SQL plus its ordered bind slice.
///
/// Owned entirely by the caller; the builder retains nothing after
/// finalizing.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<Value>,
}

impl Statement {
    pub(crate) fn new(sql: String, binds: Vec<Value>) -> Self {
        Self { sql, binds }
    }

    /// The no-op statement, produced by batch inserts over empty input.
    /// Executing it is a no-op; it must never be sent to a driver.
    pub(crate) fn empty() -> Self {
        Self {
            sql: String::new(),
            binds: Vec::new(),
        }
    }

    /// True for the no-op statement.
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Fluent builder for one SQL statement.
#[derive(Debug)]
pub struct SqlBuilder {
    dialect: Dialect,
    table: String,
    columns: Vec<String>,
    distinct: Vec<String>,
    joins: Vec<String>,
    where_clause: Option<Clause>,
    group: Option<String>,
    having: Option<Clause>,
    order: Option<String>,
    offset: Option<u64>,
    limit: Option<u64>,
    returning: Vec<String>,
}

impl SqlBuilder {
    /// Create a builder targeting the given dialect.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: String::new(),
            columns: Vec::new(),
            distinct: Vec::new(),
            joins: Vec::new(),
            where_clause: None,
            group: None,
            having: None,
            order: None,
            offset: None,
            limit: None,
            returning: Vec::new(),
        }
    }

    /// The dialect this builder emits for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Set the target table.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Set the selected columns. Unset, queries select `*`.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Select DISTINCT over the given columns. Takes precedence over
    /// [`select`](Self::select).
    pub fn distinct<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.distinct = columns.into_iter().map(Into::into).collect();
        self
    }

    fn join(mut self, kind: &str, table: &str, on: &str) -> Self {
        // Joins compose in call order and are never reordered or deduplicated.
        self.joins.push(format!("{kind} JOIN {table} ON {on}"));
        self
    }

    /// Add an INNER JOIN.
    pub fn inner_join(self, table: &str, on: &str) -> Self {
        self.join("INNER", table, on)
    }

    /// Add a LEFT JOIN.
    pub fn left_join(self, table: &str, on: &str) -> Self {
        self.join("LEFT", table, on)
    }

    /// Add a RIGHT JOIN.
    pub fn right_join(self, table: &str, on: &str) -> Self {
        self.join("RIGHT", table, on)
    }

    /// Add a FULL JOIN.
    pub fn full_join(self, table: &str, on: &str) -> Self {
        self.join("FULL", table, on)
    }

    /// Set the WHERE clause, e.g. `.where_clause("age > ?", [18])`.
    pub fn where_clause<S, I, V>(mut self, condition: S, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_clause = Some(Clause::new(condition, args));
        self
    }

    /// Set the GROUP BY column.
    pub fn group(mut self, column: impl Into<String>) -> Self {
        self.group = Some(column.into());
        self
    }

    /// Set the HAVING clause.
    pub fn having<S, I, V>(mut self, condition: S, args: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.having = Some(Clause::new(condition, args));
        self
    }

    /// Set the ORDER BY expression.
    pub fn order(mut self, expression: impl Into<String>) -> Self {
        self.order = Some(expression.into());
        self
    }

    /// Set the OFFSET row count.
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the LIMIT row count.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Override the RETURNING column list appended to Postgres inserts
    /// (defaults to `id`).
    pub fn returning<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.returning = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Finalize a SELECT statement.
    ///
    /// Clauses never set are omitted. Binds are the WHERE args followed by
    /// the HAVING args. The text is well-formed even if no table was set;
    /// supplying one is the caller's responsibility.
    pub fn to_query(self) -> Statement {
        let mut parts: Vec<String> = Vec::with_capacity(10);
        let mut binds: Vec<Value> = Vec::new();

        parts.push("SELECT".to_string());

        if !self.distinct.is_empty() {
            parts.push(format!("DISTINCT {}", self.distinct.join(", ")));
        } else if !self.columns.is_empty() {
            parts.push(self.columns.join(", "));
        } else {
            parts.push("*".to_string());
        }

        parts.push(format!("FROM {}", self.table));
        parts.extend(self.joins);

        if let Some(clause) = self.where_clause {
            let (text, args) = clause.into_parts();
            parts.push(format!("WHERE {text}"));
            binds.extend(args);
        }
        if let Some(group) = self.group {
            parts.push(format!("GROUP BY {group}"));
        }
        if let Some(clause) = self.having {
            let (text, args) = clause.into_parts();
            parts.push(format!("HAVING {text}"));
            binds.extend(args);
        }
        if let Some(order) = self.order {
            parts.push(format!("ORDER BY {order}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("OFFSET {offset}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("LIMIT {limit}"));
        }

        Statement::new(rebind(self.dialect, &parts.join(" ")), binds)
    }

    /// Finalize an INSERT of a single record or row.
    ///
    /// On Postgres the statement gets a `RETURNING` suffix: `id` unless
    /// overridden via [`returning`](Self::returning).
    pub fn to_insert(self, data: WriteData<'_>) -> Result<Statement> {
        let (columns, values) = extract::project_single("to_insert", &data)?;

        let placeholders = vec!["?"; values.len()].join(", ");
        let mut parts = vec![
            format!("INSERT INTO {}", self.table),
            format!("({})", columns.join(", ")),
            "VALUES".to_string(),
            format!("({placeholders})"),
        ];
        if let Some(returning) = self.returning_suffix() {
            parts.push(returning);
        }

        Ok(Statement::new(
            rebind(self.dialect, &parts.join(" ")),
            values,
        ))
    }

    /// Finalize a multi-row INSERT of a record or row batch.
    ///
    /// The column list comes from the first element; every element emits one
    /// `VALUES` tuple in that column order. An empty batch finalizes to the
    /// no-op [`Statement`] (check [`Statement::is_empty`]), not an error.
    pub fn to_batch_insert(self, data: WriteData<'_>) -> Result<Statement> {
        let (columns, rows) = extract::project_batch("to_batch_insert", &data)?;
        if rows.is_empty() {
            return Ok(Statement::empty());
        }

        let tuple = format!("({})", vec!["?"; columns.len()].join(", "));
        let tuples = vec![tuple; rows.len()].join(", ");
        let binds: Vec<Value> = rows.into_iter().flatten().collect();

        let parts = [
            format!("INSERT INTO {}", self.table),
            format!("({})", columns.join(", ")),
            "VALUES".to_string(),
            tuples,
        ];

        Ok(Statement::new(rebind(self.dialect, &parts.join(" ")), binds))
    }

    /// Finalize an UPDATE of a single record or row.
    ///
    /// Row cells carrying a raw [`Clause`] become raw SET expressions with
    /// their args spliced in place. Bind order is all SET args in iteration
    /// order, then the WHERE args.
    pub fn to_update(self, data: WriteData<'_>) -> Result<Statement> {
        let (sets, mut binds) = extract::set_pairs("to_update", &data)?;

        let mut parts = vec![
            format!("UPDATE {}", self.table),
            format!("SET {}", sets.join(", ")),
        ];
        if let Some(clause) = self.where_clause {
            let (text, args) = clause.into_parts();
            parts.push(format!("WHERE {text}"));
            binds.extend(args);
        }

        Ok(Statement::new(rebind(self.dialect, &parts.join(" ")), binds))
    }

    /// Finalize a DELETE statement.
    pub fn to_delete(self) -> Statement {
        let mut parts = vec![format!("DELETE FROM {}", self.table)];
        let mut binds = Vec::new();
        if let Some(clause) = self.where_clause {
            let (text, args) = clause.into_parts();
            parts.push(format!("WHERE {text}"));
            binds.extend(args);
        }
        Statement::new(rebind(self.dialect, &parts.join(" ")), binds)
    }

    fn returning_suffix(&self) -> Option<String> {
        if self.dialect != Dialect::Postgres {
            return None;
        }
        let columns = if self.returning.is_empty() {
            "id".to_string()
        } else {
            self.returning.join(", ")
        };
        Some(format!("RETURNING {columns}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row;

    #[test]
    fn test_query_defaults_to_star() {
        let stmt = SqlBuilder::new(Dialect::MySql).table("users").to_query();
        assert_eq!(stmt.sql, "SELECT * FROM users");
        assert!(stmt.binds.is_empty());
    }

    #[test]
    fn test_distinct_takes_precedence_over_select() {
        let stmt = SqlBuilder::new(Dialect::MySql)
            .table("users")
            .select(["id"])
            .distinct(["country"])
            .to_query();
        assert_eq!(stmt.sql, "SELECT DISTINCT country FROM users");
    }

    #[test]
    fn test_joins_compose_in_call_order() {
        let stmt = SqlBuilder::new(Dialect::MySql)
            .table("orders o")
            .left_join("users u", "u.id = o.user_id")
            .inner_join("items i", "i.order_id = o.id")
            .to_query();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM orders o \
             LEFT JOIN users u ON u.id = o.user_id \
             INNER JOIN items i ON i.order_id = o.id"
        );
    }

    #[test]
    fn test_full_query_clause_order() {
        let stmt = SqlBuilder::new(Dialect::MySql)
            .table("orders")
            .select(["country", "count(*) AS n"])
            .where_clause("status = ?", ["open"])
            .group("country")
            .having("count(*) > ?", [10])
            .order("n DESC")
            .offset(20)
            .limit(5)
            .to_query();
        assert_eq!(
            stmt.sql,
            "SELECT country, count(*) AS n FROM orders WHERE status = ? \
             GROUP BY country HAVING count(*) > ? ORDER BY n DESC OFFSET 20 LIMIT 5"
        );
        // WHERE args precede HAVING args.
        assert_eq!(
            stmt.binds,
            vec![Value::Text("open".to_string()), Value::Int(10)]
        );
    }

    #[test]
    fn test_insert_postgres_returning_override() {
        let row = row! { "name" => "x" };
        let stmt = SqlBuilder::new(Dialect::Postgres)
            .table("users")
            .returning(["id", "created_at"])
            .to_insert(WriteData::row(&row))
            .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO users (name) VALUES ($1) RETURNING id, created_at"
        );
    }

    #[test]
    fn test_insert_mysql_has_no_returning() {
        let row = row! { "name" => "x" };
        let stmt = SqlBuilder::new(Dialect::MySql)
            .table("users")
            .to_insert(WriteData::row(&row))
            .unwrap();
        assert_eq!(stmt.sql, "INSERT INTO users (name) VALUES (?)");
    }

    #[test]
    fn test_update_without_where() {
        let row = row! { "active" => false };
        let stmt = SqlBuilder::new(Dialect::MySql)
            .table("users")
            .to_update(WriteData::row(&row))
            .unwrap();
        assert_eq!(stmt.sql, "UPDATE users SET active = ?");
        assert_eq!(stmt.binds, vec![Value::Bool(false)]);
    }

    #[test]
    fn test_delete_without_where() {
        let stmt = SqlBuilder::new(Dialect::MySql).table("t").to_delete();
        assert_eq!(stmt.sql, "DELETE FROM t");
        assert!(stmt.binds.is_empty());
    }

    #[test]
    fn test_batch_insert_empty_is_noop() {
        let rows: Vec<crate::Row> = Vec::new();
        let stmt = SqlBuilder::new(Dialect::MySql)
            .table("t")
            .to_batch_insert(WriteData::rows(&rows))
            .unwrap();
        assert!(stmt.is_empty());
        assert!(stmt.binds.is_empty());
    }
}

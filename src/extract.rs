//! Input shapes and column/value projection for write statements.
//!
//! [`WriteData`] is the closed set of shapes the write finalizers accept:
//! a single record, a single row, or a homogeneous batch of either. Shape
//! mismatches (a batch where a single is required, or vice versa) are the
//! only remaining data-shape failures; they are logged and returned as
//! [`Error::DataShape`].

use crate::error::{Error, Result};
use crate::record::Record;
use crate::row::{Arg, Row};
use crate::value::Value;
use tracing::error;

/// Data accepted by the write finalizers, one variant per supported shape.
pub enum WriteData<'a> {
    /// A single tagged record.
    Record(&'a dyn Record),
    /// A single ordered row.
    Row(&'a Row),
    /// A homogeneous batch of records.
    Records(Vec<&'a dyn Record>),
    /// A homogeneous batch of rows.
    Rows(&'a [Row]),
}

impl<'a> WriteData<'a> {
    /// Wrap a single record.
    pub fn record<R: Record>(record: &'a R) -> Self {
        Self::Record(record)
    }

    /// Wrap a single row.
    pub fn row(row: &'a Row) -> Self {
        Self::Row(row)
    }

    /// Wrap a slice of records.
    pub fn records<R: Record>(records: &'a [R]) -> Self {
        Self::Records(records.iter().map(|r| r as &dyn Record).collect())
    }

    /// Wrap a slice of rows.
    pub fn rows(rows: &'a [Row]) -> Self {
        Self::Rows(rows)
    }

    fn shape_name(&self) -> &'static str {
        match self {
            Self::Record(_) => "record",
            Self::Row(_) => "row",
            Self::Records(_) => "record batch",
            Self::Rows(_) => "row batch",
        }
    }
}

impl std::fmt::Debug for WriteData<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Record(_) => f.write_str("WriteData::Record"),
            Self::Row(row) => f.debug_tuple("WriteData::Row").field(row).finish(),
            Self::Records(items) => f
                .debug_tuple("WriteData::Records")
                .field(&items.len())
                .finish(),
            Self::Rows(rows) => f.debug_tuple("WriteData::Rows").field(&rows.len()).finish(),
        }
    }
}

fn shape_error(operation: &'static str, message: String) -> Error {
    // Non-fatal by contract: surfaced to the logging sink, then returned.
    error!(operation, "{message}");
    Error::data_shape(operation, message)
}

/// Project a single record or row onto `(columns, values)`.
pub(crate) fn project_single(
    operation: &'static str,
    data: &WriteData<'_>,
) -> Result<(Vec<String>, Vec<Value>)> {
    match data {
        WriteData::Record(record) => {
            let fields = record.fields();
            let columns = fields.iter().map(|(c, _)| (*c).to_string()).collect();
            let values = fields.into_iter().map(|(_, v)| v).collect();
            Ok((columns, values))
        }
        WriteData::Row(row) => {
            let mut columns = Vec::with_capacity(row.len());
            let mut values = Vec::with_capacity(row.len());
            for (column, cell) in row.iter() {
                match cell {
                    Arg::Value(value) => {
                        columns.push(column.to_string());
                        values.push(value.clone());
                    }
                    Arg::Expr(_) => {
                        return Err(shape_error(
                            operation,
                            format!("raw clause in column {column:?} is only valid for updates"),
                        ));
                    }
                }
            }
            Ok((columns, values))
        }
        batch @ (WriteData::Records(_) | WriteData::Rows(_)) => Err(shape_error(
            operation,
            format!(
                "expects a single record or row, got a {}; use to_batch_insert",
                batch.shape_name()
            ),
        )),
    }
}

/// Project a batch of records or rows onto `(columns, rows-of-values)`.
///
/// The column set is derived once, from element 0; every later element
/// contributes values matched to that fixed order. An empty batch projects
/// to an empty result so callers can short-circuit to a no-op statement.
pub(crate) fn project_batch(
    operation: &'static str,
    data: &WriteData<'_>,
) -> Result<(Vec<String>, Vec<Vec<Value>>)> {
    match data {
        WriteData::Records(records) => {
            let Some(first) = records.first() else {
                return Ok((Vec::new(), Vec::new()));
            };
            let columns: Vec<String> = first
                .fields()
                .iter()
                .map(|(c, _)| (*c).to_string())
                .collect();
            let rows = records
                .iter()
                .map(|record| record.fields().into_iter().map(|(_, v)| v).collect())
                .collect();
            Ok((columns, rows))
        }
        WriteData::Rows(rows_in) => {
            let Some(first) = rows_in.first() else {
                return Ok((Vec::new(), Vec::new()));
            };
            let columns = first.columns();
            let mut rows = Vec::with_capacity(rows_in.len());
            for row in *rows_in {
                let mut values = Vec::with_capacity(columns.len());
                for column in &columns {
                    match row.get(column) {
                        Some(Arg::Value(value)) => values.push(value.clone()),
                        Some(Arg::Expr(_)) => {
                            return Err(shape_error(
                                operation,
                                format!(
                                    "raw clause in column {column:?} is only valid for updates"
                                ),
                            ));
                        }
                        // Matches the map-lookup semantics of the generic
                        // shape: a key missing from a later element binds
                        // NULL rather than failing the whole batch.
                        None => values.push(Value::Null),
                    }
                }
                rows.push(values);
            }
            Ok((columns, rows))
        }
        single @ (WriteData::Record(_) | WriteData::Row(_)) => Err(shape_error(
            operation,
            format!(
                "expects a batch of records or rows, got a single {}; use to_insert",
                single.shape_name()
            ),
        )),
    }
}

/// Project a single record or row onto UPDATE SET fragments plus their bind
/// values, in iteration order.
///
/// Row cells holding a raw [`Clause`](crate::Clause) become `col = <text>`
/// with the clause's own args spliced in at that position.
pub(crate) fn set_pairs(
    operation: &'static str,
    data: &WriteData<'_>,
) -> Result<(Vec<String>, Vec<Value>)> {
    match data {
        WriteData::Record(record) => {
            let fields = record.fields();
            let mut sets = Vec::with_capacity(fields.len());
            let mut binds = Vec::with_capacity(fields.len());
            for (column, value) in fields {
                sets.push(format!("{column} = ?"));
                binds.push(value);
            }
            Ok((sets, binds))
        }
        WriteData::Row(row) => {
            let mut sets = Vec::with_capacity(row.len());
            let mut binds = Vec::with_capacity(row.len());
            for (column, cell) in row.iter() {
                match cell {
                    Arg::Value(value) => {
                        sets.push(format!("{column} = ?"));
                        binds.push(value.clone());
                    }
                    Arg::Expr(clause) => {
                        sets.push(format!("{column} = {}", clause.text()));
                        binds.extend(clause.args().iter().cloned());
                    }
                }
            }
            Ok((sets, binds))
        }
        batch @ (WriteData::Records(_) | WriteData::Rows(_)) => Err(shape_error(
            operation,
            format!(
                "expects a single record or row, got a {}",
                batch.shape_name()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::Clause;
    use crate::row;

    struct Point {
        x: i64,
        y: i64,
    }

    crate::impl_record!(Point { x, y });

    #[test]
    fn test_project_single_row_in_insertion_order() {
        let row = row! { "b" => 2, "a" => 1 };
        let (columns, values) = project_single("to_insert", &WriteData::row(&row)).unwrap();
        assert_eq!(columns, vec!["b", "a"]);
        assert_eq!(values, vec![Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn test_project_single_rejects_batch() {
        let rows = vec![row! { "a" => 1 }];
        let err = project_single("to_insert", &WriteData::rows(&rows)).unwrap_err();
        assert!(matches!(err, Error::DataShape { operation, .. } if operation == "to_insert"));
    }

    #[test]
    fn test_project_single_rejects_clause_cell() {
        let row = row! { "n" => Clause::new("n + ?", [1]) };
        assert!(project_single("to_insert", &WriteData::row(&row)).is_err());
    }

    #[test]
    fn test_project_batch_fixes_columns_from_first_element() {
        let rows = vec![row! { "a" => 1, "b" => 2 }, row! { "b" => 4, "a" => 3 }];
        let (columns, values) = project_batch("to_batch_insert", &WriteData::rows(&rows)).unwrap();
        assert_eq!(columns, vec!["a", "b"]);
        // Second element re-ordered to the first element's key order.
        assert_eq!(values[1], vec![Value::Int(3), Value::Int(4)]);
    }

    #[test]
    fn test_project_batch_missing_key_binds_null() {
        let rows = vec![row! { "a" => 1, "b" => 2 }, row! { "a" => 3 }];
        let (_, values) = project_batch("to_batch_insert", &WriteData::rows(&rows)).unwrap();
        assert_eq!(values[1], vec![Value::Int(3), Value::Null]);
    }

    #[test]
    fn test_project_batch_empty_is_noop() {
        let rows: Vec<Row> = Vec::new();
        let (columns, values) = project_batch("to_batch_insert", &WriteData::rows(&rows)).unwrap();
        assert!(columns.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn test_project_batch_records() {
        let points = vec![Point { x: 1, y: 2 }, Point { x: 3, y: 4 }];
        let (columns, values) =
            project_batch("to_batch_insert", &WriteData::records(&points)).unwrap();
        assert_eq!(columns, vec!["x", "y"]);
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], vec![Value::Int(1), Value::Int(2)]);
    }

    #[test]
    fn test_set_pairs_splices_clause_args_in_place() {
        let row = row! {
            "price" => Clause::new("price + ?", [5]),
            "name" => "x",
        };
        let (sets, binds) = set_pairs("to_update", &WriteData::row(&row)).unwrap();
        assert_eq!(sets, vec!["price = price + ?", "name = ?"]);
        assert_eq!(binds, vec![Value::Int(5), Value::Text("x".to_string())]);
    }
}

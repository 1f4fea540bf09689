//! Insertion-ordered rows.
//!
//! [`Row`] is the generic key-value input shape for write statements. Column
//! derivation follows the row's iteration order, so the order is pinned
//! explicitly: a `Row` iterates in insertion order, backed by a plain vector
//! rather than a hash map. This is what makes generated column lists and
//! bind slices reproducible across runs.

use crate::clause::Clause;
use crate::value::Value;
use chrono::{DateTime, Utc};

/// A single cell of a [`Row`]: either a bindable value or a raw SQL
/// expression.
///
/// Expressions are meaningful only in UPDATE SET position (`col = <expr>`);
/// in INSERT position they are rejected as a data-shape error.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Value(Value),
    Expr(Clause),
}

impl From<Clause> for Arg {
    fn from(clause: Clause) -> Self {
        Self::Expr(clause)
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

macro_rules! arg_from_value_types {
    ($($ty:ty),+ $(,)?) => {$(
        impl From<$ty> for Arg {
            fn from(v: $ty) -> Self {
                Self::Value(Value::from(v))
            }
        }
    )+};
}

arg_from_value_types!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    &str,
    String,
    Vec<u8>,
    &[u8],
    DateTime<Utc>,
    serde_json::Value,
);

impl<T: Into<Value>> From<Option<T>> for Arg {
    fn from(v: Option<T>) -> Self {
        Self::Value(Value::from(v))
    }
}

/// An ordered column -> cell map.
///
/// Keys iterate in insertion order. Setting an existing key replaces its
/// cell in place, keeping the original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Arg)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column's cell, preserving the column's position if it already
    /// exists.
    pub fn set(&mut self, column: impl Into<String>, cell: impl Into<Arg>) -> &mut Self {
        let column = column.into();
        let cell = cell.into();
        match self.entries.iter_mut().find(|(k, _)| *k == column) {
            Some(entry) => entry.1 = cell,
            None => self.entries.push((column, cell)),
        }
        self
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&Arg> {
        self.entries
            .iter()
            .find(|(k, _)| k == column)
            .map(|(_, v)| v)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arg)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> Vec<String> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, A: Into<Arg>> FromIterator<(K, A)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.set(k, v);
        }
        row
    }
}

/// Build a [`Row`] literal in insertion order.
///
/// ```
/// use sqlkit::row;
///
/// let data = row! {
///     "name" => "alice",
///     "age" => 30,
/// };
/// assert_eq!(data.columns(), vec!["name", "age"]);
/// ```
#[macro_export]
macro_rules! row {
    () => {
        $crate::Row::new()
    };
    ($($column:expr => $cell:expr),+ $(,)?) => {{
        let mut row = $crate::Row::new();
        $(row.set($column, $cell);)+
        row
    }};
}

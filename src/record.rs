//! Tagged record input shape.
//!
//! A [`Record`] is a value object whose fields project onto columns in
//! declaration order. Implementations are normally generated with
//! [`impl_record!`](crate::impl_record), which carries the column-tag rule:
//! a bare field name maps to a column of the same name, `field => "col"`
//! renames it, and a field left out of the listing is excluded from
//! statements entirely.

use crate::value::Value;

/// A value object that projects onto an ordered column/value list.
pub trait Record {
    /// The record's fields as `(column, value)` pairs, in declaration order.
    fn fields(&self) -> Vec<(&'static str, Value)>;
}

impl<R: Record> Record for &R {
    fn fields(&self) -> Vec<(&'static str, Value)> {
        (**self).fields()
    }
}

/// Implement [`Record`] for a struct by listing its database fields.
///
/// Listed order is the projection order. Each entry is either a bare field
/// name (column = identifier) or `field => "column"` (explicit column tag).
/// Omit a field to exclude it from generated statements.
///
/// ```
/// use sqlkit::{impl_record, Record};
///
/// struct Account {
///     id: i64,
///     email: String,
///     password_hash: String, // never written by generated statements
/// }
///
/// impl_record!(Account { id, email => "email_address" });
///
/// let account = Account {
///     id: 7,
///     email: "a@b.c".into(),
///     password_hash: "secret".into(),
/// };
/// let fields = account.fields();
/// assert_eq!(fields[0].0, "id");
/// assert_eq!(fields[1].0, "email_address");
/// assert_eq!(fields.len(), 2);
/// # let _ = &account.password_hash;
/// ```
#[macro_export]
macro_rules! impl_record {
    ($ty:ty { $($field:ident $(=> $column:literal)?),+ $(,)? }) => {
        impl $crate::Record for $ty {
            fn fields(&self) -> ::std::vec::Vec<(&'static str, $crate::Value)> {
                ::std::vec![
                    $((
                        $crate::impl_record!(@column $field $(=> $column)?),
                        $crate::Value::from(self.$field.clone()),
                    )),+
                ]
            }
        }
    };
    (@column $field:ident) => {
        ::core::stringify!($field)
    };
    (@column $field:ident => $column:literal) => {
        $column
    };
}

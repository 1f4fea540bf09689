//! Placeholder rebinding.
//!
//! Statements are assembled with the generic `?` placeholder and rewritten
//! into the dialect's native form as the last step of every finalizer.
//! Postgres placeholders are numbered `$1, $2, ...` in left-to-right
//! occurrence order, which must equal the bind slice order; MySQL and SQLite
//! use `?` natively, so their statements pass through unchanged.

use crate::dialect::Dialect;
use std::fmt::Write;

/// Rewrite every generic `?` placeholder in `sql` into the dialect-native
/// form.
///
/// The scan is purely lexical: a `?` inside a quoted literal would be
/// rewritten too. Callers parameterize all user-controlled values, so
/// generated statements never carry literals that could contain one.
pub fn rebind(dialect: Dialect, sql: &str) -> String {
    match dialect {
        Dialect::MySql | Dialect::Sqlite => sql.to_owned(),
        Dialect::Postgres => {
            let mut out = String::with_capacity(sql.len() + 8);
            let mut n = 0usize;
            for ch in sql.chars() {
                if ch == '?' {
                    n += 1;
                    let _ = write!(out, "${n}");
                } else {
                    out.push(ch);
                }
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_and_sqlite_pass_through() {
        let sql = "SELECT * FROM users WHERE age > ? AND name = ?";
        assert_eq!(rebind(Dialect::MySql, sql), sql);
        assert_eq!(rebind(Dialect::Sqlite, sql), sql);
    }

    #[test]
    fn test_postgres_numbers_placeholders_in_order() {
        assert_eq!(
            rebind(Dialect::Postgres, "SELECT * FROM users WHERE age > ? AND name = ?"),
            "SELECT * FROM users WHERE age > $1 AND name = $2"
        );
    }

    #[test]
    fn test_postgres_numbering_is_contiguous_from_one() {
        let sql = "INSERT INTO t (a, b, c) VALUES (?, ?, ?), (?, ?, ?)";
        let rebound = rebind(Dialect::Postgres, sql);
        for n in 1..=6 {
            assert!(rebound.contains(&format!("${n}")), "missing ${n} in {rebound}");
        }
        assert!(!rebound.contains('?'));
        assert!(!rebound.contains("$0"));
        assert!(!rebound.contains("$7"));
    }

    #[test]
    fn test_placeholder_count_is_preserved() {
        let sql = "UPDATE t SET a = ?, b = price * ? + ? WHERE id = ?";
        let rebound = rebind(Dialect::Postgres, sql);
        let count = (1..).take_while(|n| rebound.contains(&format!("${n}"))).count();
        assert_eq!(count, sql.matches('?').count());
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        assert_eq!(rebind(Dialect::Postgres, "DELETE FROM t"), "DELETE FROM t");
    }
}

//! SQL statement generation from row data.
//!
//! These are the inverse of [`parse_change_fragment`](crate::parse_change_fragment):
//! they write complete `INSERT`, `UPDATE` and `DELETE` statements for a row,
//! quoting the table with [`quote_fqident`], columns with [`quote_ident`]
//! and values with [`quote_literal`].
//!
//! # Example
//!
//! ```rust
//! use sql_fragments::builders::{delete_sql, insert_sql, update_sql};
//!
//! let row = [("id", Some("1")), ("data", None)];
//! assert_eq!(
//!     insert_sql(row, "tbl"),
//!     "insert into public.tbl (id, data) values ('1', null);"
//! );
//!
//! let row = [("id", "0"), ("id2", "2"), ("data", "str\\")];
//! assert_eq!(
//!     update_sql(row, "Table", &["id", "id2"]).unwrap(),
//!     r#"update only public."Table" set data = E'str\\' where id = '0' and id2 = '2';"#
//! );
//! assert_eq!(
//!     delete_sql(row, "Table", &["id"]).unwrap(),
//!     r#"delete from only public."Table" where id = '0';"#
//! );
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use crate::errors::Error;
use crate::quoting::{ToSqlText, quote_fqident, quote_ident, quote_literal};

/// Write an `INSERT` statement for `row` into `table`.
///
/// Columns appear in row order. An unqualified table name is placed in the
/// `public` schema.
#[must_use]
pub fn insert_sql<K, V>(row: impl IntoIterator<Item = (K, V)>, table: &str) -> String
where
    K: AsRef<str>,
    V: ToSqlText,
{
    let mut columns = String::new();
    let mut values = String::new();
    for (i, (column, value)) in row.into_iter().enumerate() {
        if i > 0 {
            columns.push_str(", ");
            values.push_str(", ");
        }
        columns.push_str(&quote_ident(column.as_ref()));
        values.push_str(&quote_literal(&value));
    }

    let mut sql = String::from("insert into ");
    sql.push_str(&quote_fqident(table));
    sql.push_str(" (");
    sql.push_str(&columns);
    sql.push_str(") values (");
    sql.push_str(&values);
    sql.push_str(");");
    sql
}

/// Write an `INSERT` statement with the columns renamed by `field_map`.
///
/// `field_map` pairs a source column of `row` with its name in `table`.
/// Only mapped columns are written, in map order.
///
/// # Errors
///
/// Returns [`Error::UnknownColumn`] when a mapped source column is not a
/// column of `row`.
pub fn insert_sql_mapped<K, V>(
    row: impl IntoIterator<Item = (K, V)>,
    table: &str,
    field_map: &[(&str, &str)],
) -> Result<String, Error>
where
    K: AsRef<str>,
    V: ToSqlText,
{
    let row: Vec<(K, V)> = row.into_iter().collect();
    let mapped = field_map
        .iter()
        .map(|&(source, target)| lookup(&row, source).map(|value| (target, value)))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(insert_sql(mapped, table))
}

/// Write an `UPDATE` statement setting the non-key columns of `row`.
///
/// The row is matched on `pkeys`, in the order given; every other column is
/// assigned in row order.
///
/// # Errors
///
/// - [`Error::MissingKeys`] when `pkeys` is empty;
/// - [`Error::UnknownColumn`] when a key is not a column of `row`.
pub fn update_sql<K, V>(
    row: impl IntoIterator<Item = (K, V)>,
    table: &str,
    pkeys: &[&str],
) -> Result<String, Error>
where
    K: AsRef<str>,
    V: ToSqlText,
{
    let row: Vec<(K, V)> = row.into_iter().collect();
    let predicate = key_predicate(&row, pkeys, None, "UPDATE")?;
    let assignments = row
        .iter()
        .filter(|(column, _)| !pkeys.contains(&column.as_ref()))
        .map(|(column, value)| (column.as_ref(), value));
    Ok(render_update(table, assignments, &predicate))
}

/// Write an `UPDATE` statement with the columns renamed by `field_map`.
///
/// Keys are given by their source names. The non-key columns of the map
/// are assigned in map order.
///
/// # Errors
///
/// - [`Error::MissingKeys`] when `pkeys` is empty;
/// - [`Error::UnknownColumn`] when a key is missing from `row` or
///   `field_map`, or a mapped source column is not a column of `row`.
///
/// # Example
///
/// ```rust
/// use sql_fragments::builders::update_sql_mapped;
///
/// let row = [("id", "0"), ("data", "x"), ("extra", "y")];
/// assert_eq!(
///     update_sql_mapped(row, "t", &["id"], &[("id", "_id"), ("data", "_data")]).unwrap(),
///     "update only public.t set _data = 'x' where _id = '0';"
/// );
/// ```
pub fn update_sql_mapped<K, V>(
    row: impl IntoIterator<Item = (K, V)>,
    table: &str,
    pkeys: &[&str],
    field_map: &[(&str, &str)],
) -> Result<String, Error>
where
    K: AsRef<str>,
    V: ToSqlText,
{
    let row: Vec<(K, V)> = row.into_iter().collect();
    let predicate = key_predicate(&row, pkeys, Some(field_map), "UPDATE")?;
    let assignments = field_map
        .iter()
        .filter(|(source, _)| !pkeys.contains(source))
        .map(|&(source, target)| lookup(&row, source).map(|value| (target, value)))
        .collect::<Result<Vec<_>, Error>>()?;
    Ok(render_update(table, assignments, &predicate))
}

/// Write a `DELETE` statement for the row identified by `pkeys`.
///
/// # Errors
///
/// - [`Error::MissingKeys`] when `pkeys` is empty;
/// - [`Error::UnknownColumn`] when a key is not a column of `row`.
pub fn delete_sql<K, V>(
    row: impl IntoIterator<Item = (K, V)>,
    table: &str,
    pkeys: &[&str],
) -> Result<String, Error>
where
    K: AsRef<str>,
    V: ToSqlText,
{
    let row: Vec<(K, V)> = row.into_iter().collect();
    let predicate = key_predicate(&row, pkeys, None, "DELETE")?;
    Ok(render_delete(table, &predicate))
}

/// Write a `DELETE` statement with the key columns renamed by `field_map`.
///
/// # Errors
///
/// - [`Error::MissingKeys`] when `pkeys` is empty;
/// - [`Error::UnknownColumn`] when a key is missing from `row` or `field_map`.
pub fn delete_sql_mapped<K, V>(
    row: impl IntoIterator<Item = (K, V)>,
    table: &str,
    pkeys: &[&str],
    field_map: &[(&str, &str)],
) -> Result<String, Error>
where
    K: AsRef<str>,
    V: ToSqlText,
{
    let row: Vec<(K, V)> = row.into_iter().collect();
    let predicate = key_predicate(&row, pkeys, Some(field_map), "DELETE")?;
    Ok(render_delete(table, &predicate))
}

fn render_update<'r, V: ToSqlText + 'r>(
    table: &str,
    assignments: impl IntoIterator<Item = (&'r str, &'r V)>,
    predicate: &str,
) -> String {
    let mut sql = String::from("update only ");
    sql.push_str(&quote_fqident(table));
    sql.push_str(" set ");
    for (i, (column, value)) in assignments.into_iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        push_pair(&mut sql, column, value);
    }
    sql.push_str(" where ");
    sql.push_str(predicate);
    sql.push(';');
    sql
}

fn render_delete(table: &str, predicate: &str) -> String {
    let mut sql = String::from("delete from only ");
    sql.push_str(&quote_fqident(table));
    sql.push_str(" where ");
    sql.push_str(predicate);
    sql.push(';');
    sql
}

fn lookup<'r, K: AsRef<str>, V>(row: &'r [(K, V)], column: &str) -> Result<&'r V, Error> {
    row.iter()
        .find(|(name, _)| name.as_ref() == column)
        .map(|(_, value)| value)
        .ok_or_else(|| Error::UnknownColumn(column.into()))
}

/// `k1 = v1 and k2 = v2 ...` over the key columns, in key order, with the
/// column names renamed through `field_map` when one is given.
fn key_predicate<K, V>(
    row: &[(K, V)],
    pkeys: &[&str],
    field_map: Option<&[(&str, &str)]>,
    statement: &'static str,
) -> Result<String, Error>
where
    K: AsRef<str>,
    V: ToSqlText,
{
    if pkeys.is_empty() {
        return Err(Error::MissingKeys { statement });
    }
    let mut predicate = String::new();
    for (i, &key) in pkeys.iter().enumerate() {
        let value = lookup(row, key)?;
        let column = match field_map {
            None => key,
            Some(field_map) => field_map
                .iter()
                .find(|(source, _)| *source == key)
                .map(|&(_, target)| target)
                .ok_or_else(|| Error::UnknownColumn(key.into()))?,
        };
        if i > 0 {
            predicate.push_str(" and ");
        }
        push_pair(&mut predicate, column, value);
    }
    Ok(predicate)
}

fn push_pair<V: ToSqlText>(sql: &mut String, column: &str, value: &V) {
    sql.push_str(&quote_ident(column));
    sql.push_str(" = ");
    sql.push_str(&quote_literal(value));
}

//! Substituting quoted parameters into statement templates.

use alloc::string::String;

use super::literal::quote_literal;
use super::value::ToSqlText;
use crate::errors::Error;

/// Parameters for [`quote_statement`].
///
/// Named parameters fill `%(name)s` placeholders, positional parameters fill
/// `%s` placeholders in order. A template uses one style only.
#[derive(Debug, Clone, Copy)]
pub enum Params<'p, V> {
    /// Values looked up by placeholder name.
    Named(&'p [(&'p str, V)]),
    /// Values consumed left to right.
    Positional(&'p [V]),
}

/// Substitute SQL-quoted parameters into a statement template.
///
/// Each placeholder is replaced by [`quote_literal`] of its value and `%%`
/// becomes `%`. Nothing else in the template is interpreted.
///
/// # Errors
///
/// - [`Error::MissingParameter`] when a named placeholder has no value;
/// - [`Error::ParameterCount`] when positional placeholders and values differ
///   in number;
/// - [`Error::MalformedPlaceholder`] for any other use of `%`, including a
///   placeholder of the wrong style.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::{Params, quote_statement};
///
/// let sql = quote_statement(
///     "select * from t where id = %(id)s and name = %(name)s",
///     &Params::Named(&[("id", Some("1")), ("name", None)]),
/// )
/// .unwrap();
/// assert_eq!(sql, "select * from t where id = '1' and name = null");
///
/// let sql = quote_statement("select %s, %s", &Params::Positional(&["a'b", "50%"])).unwrap();
/// assert_eq!(sql, "select 'a''b', '50%'");
/// ```
pub fn quote_statement<V: ToSqlText>(sql: &str, params: &Params<'_, V>) -> Result<String, Error> {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut copied = 0;
    let mut used = 0;
    let mut pos = 0;

    while let Some(offset) = sql[pos..].find('%') {
        let start = pos + offset;
        out.push_str(&sql[copied..start]);
        let malformed = Error::MalformedPlaceholder { pos: start };
        match (bytes.get(start + 1), params) {
            (Some(b'%'), _) => {
                out.push('%');
                pos = start + 2;
            }
            (Some(b's'), Params::Positional(values)) => {
                if let Some(value) = values.get(used) {
                    out.push_str(&quote_literal(value));
                }
                used += 1;
                pos = start + 2;
            }
            (Some(b'('), Params::Named(values)) => {
                let close = sql[start..].find(")s").ok_or(malformed)?;
                let name = &sql[start + 2..start + close];
                let value = values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value)
                    .ok_or_else(|| Error::MissingParameter(name.into()))?;
                out.push_str(&quote_literal(value));
                pos = start + close + 2;
            }
            _ => return Err(malformed),
        }
        copied = pos;
    }
    out.push_str(&sql[copied..]);

    if let Params::Positional(values) = params {
        if used != values.len() {
            return Err(Error::ParameterCount {
                expected: used,
                found: values.len(),
            });
        }
    }
    Ok(out)
}

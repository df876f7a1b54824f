//! SQL identifiers: quoting and unquoting of plain and schema-qualified names.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;

use super::keywords::is_reserved;
use super::literal::undouble;
use crate::errors::Error;

/// Schema assumed for names that carry none.
pub const DEFAULT_SCHEMA: &str = "public";

/// Whether `name` can be written without double quotes.
fn is_bare_identifier(name: &str) -> bool {
    let mut bytes = name.bytes();
    let Some(first) = bytes.next() else {
        return false;
    };
    (first == b'_' || first.is_ascii_lowercase())
        && bytes.all(|b| b == b'_' || b.is_ascii_lowercase() || b.is_ascii_digit())
        && !is_reserved(name)
}

/// Quote a SQL identifier when needed.
///
/// Names made of lower-case ASCII letters, digits and underscores (not
/// starting with a digit) that are not reserved keywords are returned as is.
/// Everything else is wrapped in double quotes with embedded quotes doubled.
///
/// Quoting is not idempotent: an already quoted name is quoted again.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::quote_ident;
///
/// assert_eq!(quote_ident("abc_19"), "abc_19");
/// assert_eq!(quote_ident("from"), "\"from\"");
/// assert_eq!(quote_ident("mixCase"), "\"mixCase\"");
/// assert_eq!(quote_ident(""), "\"\"");
/// ```
#[must_use]
pub fn quote_ident(name: &str) -> Cow<'_, str> {
    if is_bare_identifier(name) {
        return Cow::Borrowed(name);
    }
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for c in name.chars() {
        if c == '"' {
            out.push_str("\"\"");
        } else {
            out.push(c);
        }
    }
    out.push('"');
    Cow::Owned(out)
}

/// Unquote a possibly quoted SQL identifier.
///
/// A quoted identifier loses its quotes and its doubled quotes are
/// collapsed; an unquoted one is folded to lower case, as the server does.
///
/// # Errors
///
/// Returns [`Error::MalformedIdentifier`] when an unquoted identifier
/// contains a double quote, or a quoted one contains a lone inner quote.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::unquote_ident;
///
/// assert_eq!(unquote_ident("\"Foo \"\"Bar\"\"\"").unwrap(), "Foo \"Bar\"");
/// assert_eq!(unquote_ident("FooBar").unwrap(), "foobar");
/// assert!(unquote_ident("foo\"bar").is_err());
/// ```
pub fn unquote_ident(text: &str) -> Result<Cow<'_, str>, Error> {
    if text.len() > 1 && text.starts_with('"') && text.ends_with('"') {
        let inner = &text[1..text.len() - 1];
        let mut bytes = inner.bytes();
        while let Some(b) = bytes.next() {
            if b == b'"' && bytes.next() != Some(b'"') {
                return Err(Error::MalformedIdentifier(text.into()));
            }
        }
        return Ok(undouble(inner, "\"\"", "\""));
    }
    if text.contains('"') {
        return Err(Error::MalformedIdentifier(text.into()));
    }
    if text.chars().any(char::is_uppercase) {
        Ok(Cow::Owned(text.to_lowercase()))
    } else {
        Ok(Cow::Borrowed(text))
    }
}

/// Quote a fully-qualified identifier, defaulting the schema to `public`.
///
/// The first `.` separates schema from name; each part is quoted on its own.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::quote_fqident;
///
/// assert_eq!(quote_fqident("tbl"), "public.tbl");
/// assert_eq!(quote_fqident("Sch.Tbl"), "\"Sch\".\"Tbl\"");
/// ```
#[must_use]
pub fn quote_fqident(name: &str) -> String {
    let (schema, table) = fq_name_parts(name);
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

/// Unquote a fully-qualified identifier.
///
/// Splits on the first `.` that is not inside double quotes and unquotes
/// both parts. A name without schema is unquoted as a plain identifier.
///
/// # Errors
///
/// Returns [`Error::MalformedIdentifier`] when either part is malformed.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::unquote_fqident;
///
/// assert_eq!(unquote_fqident("Public.\"a.B\"").unwrap(), "public.a.B");
/// ```
pub fn unquote_fqident(text: &str) -> Result<String, Error> {
    let mut quoted = false;
    let split = text.bytes().position(|b| {
        if b == b'"' {
            quoted = !quoted;
        }
        b == b'.' && !quoted
    });
    match split {
        None => Ok(unquote_ident(text)?.into_owned()),
        Some(dot) => {
            let schema = unquote_ident(&text[..dot])?;
            let name = unquote_ident(&text[dot + 1..])?;
            Ok(format!("{schema}.{name}"))
        }
    }
}

/// Split a table name into schema and name, without any quoting.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::fq_name_parts;
///
/// assert_eq!(fq_name_parts("tbl"), ("public", "tbl"));
/// assert_eq!(fq_name_parts("foo.tbl.baz"), ("foo", "tbl.baz"));
/// ```
#[must_use]
pub fn fq_name_parts(name: &str) -> (&str, &str) {
    name.split_once('.').unwrap_or((DEFAULT_SCHEMA, name))
}

/// Return the schema-qualified form of a table name.
#[must_use]
pub fn fq_name(name: &str) -> Cow<'_, str> {
    if name.contains('.') {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEMA}.{name}"))
    }
}

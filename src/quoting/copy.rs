//! COPY text format and bytea escaping.

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt::Write;

use super::literal::{quote_literal, unescape};
use super::value::ToSqlText;

/// Marker for `NULL` in COPY text format.
pub const COPY_NULL: &str = "\\N";

/// Quote a value for COPY text format.
///
/// `NULL` becomes `\N`; backslash, tab, newline and carriage return are
/// backslash-escaped.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::quote_copy;
///
/// assert_eq!(quote_copy(&None::<&str>), "\\N");
/// assert_eq!(quote_copy("a'\tb"), "a'\\tb");
/// ```
#[must_use]
pub fn quote_copy<V: ToSqlText + ?Sized>(value: &V) -> String {
    let Some(text) = value.to_sql_text() else {
        return COPY_NULL.into();
    };
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode a COPY text field: `\N` is `NULL`, anything else is unescaped.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::unescape_copy;
///
/// assert_eq!(unescape_copy("\\N"), None);
/// assert_eq!(unescape_copy("a\\tb").as_deref(), Some("a\tb"));
/// ```
#[must_use]
pub fn unescape_copy(text: &str) -> Option<Cow<'_, str>> {
    if text == COPY_NULL {
        None
    } else if text.contains('\\') {
        Some(Cow::Owned(unescape(text)))
    } else {
        Some(Cow::Borrowed(text))
    }
}

/// Escape raw bytes for the bytea escape input format.
///
/// Printable ASCII is kept, backslash is doubled and every other byte is
/// written as a three-digit octal escape.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::quote_bytea_raw;
///
/// assert_eq!(quote_bytea_raw(b"a'\tb"), "a'\\011b");
/// ```
#[must_use]
pub fn quote_bytea_raw(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            0x20..0x7F => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\{b:03o}");
            }
        }
    }
    out
}

/// Quote raw bytes as a SQL literal for a bytea column.
#[must_use]
pub fn quote_bytea_literal(bytes: Option<&[u8]>) -> String {
    quote_literal(&bytes.map(quote_bytea_raw))
}

/// Quote raw bytes as a COPY field for a bytea column.
#[must_use]
pub fn quote_bytea_copy(bytes: Option<&[u8]>) -> String {
    quote_copy(&bytes.map(quote_bytea_raw))
}

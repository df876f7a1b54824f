//! JSON string quoting.

use alloc::string::String;
use core::fmt::Write;

use super::value::ToSqlText;

/// Quote a value as a JSON string; `NULL` becomes `null`.
///
/// Besides the characters JSON requires to be escaped, `/` is escaped too so
/// the output can be embedded in HTML without closing a script tag.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::quote_json;
///
/// assert_eq!(quote_json(&None::<&str>), "null");
/// assert_eq!(quote_json("a\"b</c>"), r#""a\"b<\/c>""#);
/// ```
#[must_use]
pub fn quote_json<V: ToSqlText + ?Sized>(value: &V) -> String {
    let Some(text) = value.to_sql_text() else {
        return "null".into();
    };
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '/' => out.push_str("\\/"),
            '\0'..='\u{1f}' => {
                let _ = write!(out, "\\u{:04x}", u32::from(c));
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_json() {
        assert_eq!(quote_json(&None::<&str>), "null");
        assert_eq!(quote_json(""), "\"\"");
        assert_eq!(quote_json("a\nb\tc"), r#""a\nb\tc""#);
        assert_eq!(quote_json("\u{1}\u{1f}"), r#""\u0001\u001f""#);
        assert_eq!(quote_json("ünï"), "\"ünï\"");
        assert_eq!(quote_json(&42), "\"42\"");
    }
}

//! SQL string literals: quoting, unquoting and C-style escape removal.

use alloc::borrow::Cow;
use alloc::string::String;

use super::value::ToSqlText;
use crate::errors::Error;

/// Quote a value as a SQL literal.
///
/// `NULL` renders as `null` without quotes. Text is wrapped in single quotes
/// with embedded quotes doubled. When the text contains a backslash the
/// extended `E'...'` form is used and backslashes are doubled too, so the
/// result reads the same whatever `standard_conforming_strings` is set to.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::quote_literal;
///
/// assert_eq!(quote_literal(&None::<&str>), "null");
/// assert_eq!(quote_literal("a'b"), "'a''b'");
/// assert_eq!(quote_literal(r"a\'b"), r"E'a\\''b'");
/// assert_eq!(quote_literal(&1), "'1'");
/// ```
#[must_use]
pub fn quote_literal<V: ToSqlText + ?Sized>(value: &V) -> String {
    match value.to_sql_text() {
        None => "null".into(),
        Some(text) => quote_text(&text),
    }
}

fn quote_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 3);
    if text.contains('\\') {
        out.push('E');
    }
    out.push('\'');
    for c in text.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Unquote a SQL literal back into its value.
///
/// - `'...'` un-doubles quotes; unless `standard_quoting` is set, backslash
///   escapes are decoded as well;
/// - `E'...'` always decodes backslash escapes;
/// - `$tag$...$tag$` returns the content verbatim;
/// - unquoted `null` (any case) is `None`;
/// - anything else (numbers, bare words, parameters) is returned unchanged.
///
/// # Errors
///
/// Returns [`Error::MalformedLiteral`] when a quote is not terminated, a
/// dollar tag has no matching closing tag, or an escape is dangling.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::unquote_literal;
///
/// assert_eq!(unquote_literal("E'a\\n\\tb'", false).unwrap().as_deref(), Some("a\n\tb"));
/// assert_eq!(unquote_literal("'a''b'", true).unwrap().as_deref(), Some("a'b"));
/// assert_eq!(unquote_literal("NULL", false).unwrap(), None);
/// assert_eq!(unquote_literal("$x$don't$x$", false).unwrap().as_deref(), Some("don't"));
/// ```
pub fn unquote_literal(text: &str, standard_quoting: bool) -> Result<Option<Cow<'_, str>>, Error> {
    let bytes = text.as_bytes();
    match bytes.first() {
        Some(b'\'') => {
            let body = quoted_body(text, 1, !standard_quoting)?;
            if standard_quoting {
                Ok(Some(undouble(body, "''", "'")))
            } else {
                decode_extended(text, body).map(Some)
            }
        }
        Some(b'E' | b'e') if bytes.get(1) == Some(&b'\'') => {
            let body = quoted_body(text, 2, true)?;
            decode_extended(text, body).map(Some)
        }
        Some(b'$') => unquote_dollar(text).map(Some),
        _ if text.eq_ignore_ascii_case("null") => Ok(None),
        _ => Ok(Some(Cow::Borrowed(text))),
    }
}

/// Returns the text between the opening quote at `open - 1` and the final quote.
///
/// Every quote inside the body must be doubled, or backslash-escaped when
/// `backslashes` is set; a lone quote closes the string before the end.
fn quoted_body(text: &str, open: usize, backslashes: bool) -> Result<&str, Error> {
    let malformed = |reason| Error::MalformedLiteral {
        literal: text.into(),
        reason,
    };
    if text.len() <= open || !text.ends_with('\'') {
        return Err(malformed("unterminated quoted string"));
    }
    let body = &text[open..text.len() - 1];
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if backslashes => i += 2,
            b'\'' if bytes.get(i + 1) == Some(&b'\'') => i += 2,
            b'\'' => return Err(malformed("unescaped quote inside quoted string")),
            _ => i += 1,
        }
    }
    Ok(body)
}

fn decode_extended<'a>(text: &str, body: &'a str) -> Result<Cow<'a, str>, Error> {
    if !body.contains(['\\', '\'']) {
        return Ok(Cow::Borrowed(body));
    }
    let mut out = String::with_capacity(body.len());
    if decode_escapes(body, true, &mut out) {
        return Err(Error::MalformedLiteral {
            literal: text.into(),
            reason: "dangling backslash escape",
        });
    }
    Ok(Cow::Owned(out))
}

fn unquote_dollar(text: &str) -> Result<Cow<'_, str>, Error> {
    let Some(tag_len) = dollar_tag_len(text.as_bytes()) else {
        // `$1` and friends are not dollar quotes.
        return Ok(Cow::Borrowed(text));
    };
    let tag = &text[..tag_len];
    if text.len() >= 2 * tag_len && text.ends_with(tag) {
        Ok(Cow::Borrowed(&text[tag_len..text.len() - tag_len]))
    } else {
        Err(Error::MalformedLiteral {
            literal: text.into(),
            reason: "dollar-quote tag is not closed by the same tag",
        })
    }
}

/// Length of the `$tag$` opening a dollar quote at the start of `bytes`.
///
/// The tag is optional; when present it is `[_a-z][_a-z0-9]*` (any case).
pub(crate) fn dollar_tag_len(bytes: &[u8]) -> Option<usize> {
    if bytes.first() != Some(&b'$') {
        return None;
    }
    let mut pos = 1;
    if let Some(&b) = bytes.get(pos) {
        if b == b'_' || b.is_ascii_alphabetic() {
            pos += 1;
            while let Some(&b) = bytes.get(pos) {
                if b == b'_' || b.is_ascii_alphanumeric() {
                    pos += 1;
                } else {
                    break;
                }
            }
        }
    }
    (bytes.get(pos) == Some(&b'$')).then_some(pos + 1)
}

/// Replaces every `from` with `to`, borrowing when there is nothing to replace.
pub(crate) fn undouble<'a>(body: &'a str, from: &str, to: &str) -> Cow<'a, str> {
    if body.contains(from) {
        Cow::Owned(body.replace(from, to))
    } else {
        Cow::Borrowed(body)
    }
}

/// Remove C-style backslash escapes.
///
/// Recognizes `\t`, `\n`, `\r`, `\a`, `\b`, `\'`, `\"`, `\\` and octal
/// `\o`..`\ooo`; any other escaped character stands for itself. A trailing
/// lone backslash is kept.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::unescape;
///
/// assert_eq!(unescape(r"a\001b\tc\r\n"), "a\u{1}b\tc\r\n");
/// assert_eq!(unescape(r"\N"), "N");
/// ```
#[must_use]
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    if decode_escapes(text, false, &mut out) {
        out.push('\\');
    }
    out
}

/// Decodes backslash escapes (and `''` when `doubled_quotes`) into `out`.
///
/// Returns `true` when the input ends with a lone backslash, which is not
/// written to `out`.
fn decode_escapes(body: &str, doubled_quotes: bool, out: &mut String) -> bool {
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\'' if doubled_quotes && chars.peek() == Some(&'\'') => {
                chars.next();
                out.push('\'');
            }
            '\\' => {
                let Some(escaped) = chars.next() else {
                    return true;
                };
                if let Some(mut code) = escaped.to_digit(8) {
                    for _ in 0..2 {
                        match chars.peek().and_then(|d| d.to_digit(8)) {
                            Some(digit) => {
                                code = code * 8 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    // At most 0o777, always a valid scalar value.
                    out.extend(char::from_u32(code));
                } else {
                    out.push(match escaped {
                        't' => '\t',
                        'n' => '\n',
                        'r' => '\r',
                        'a' => '\u{7}',
                        'b' => '\u{8}',
                        other => other,
                    });
                }
            }
            _ => out.push(c),
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_literal() {
        assert_eq!(quote_literal(&None::<&str>), "null");
        assert_eq!(quote_literal(""), "''");
        assert_eq!(quote_literal("a'b"), "'a''b'");
        assert_eq!(quote_literal(r"a\'b"), r"E'a\\''b'");
        assert_eq!(quote_literal(&1), "'1'");
        assert_eq!(quote_literal(&true), "'True'");
    }

    fn unq(text: &str, standard: bool) -> Option<String> {
        unquote_literal(text, standard)
            .unwrap()
            .map(Cow::into_owned)
    }

    #[test]
    fn test_unquote_common() {
        for standard in [false, true] {
            assert_eq!(unq("null", standard), None);
            assert_eq!(unq("NULL", standard), None);
            assert_eq!(unq("123", standard).as_deref(), Some("123"));
            assert_eq!(unq("''", standard).as_deref(), Some(""));
            assert_eq!(unq("'a''b''c'", standard).as_deref(), Some("a'b'c"));
            assert_eq!(unq("'foo'", standard).as_deref(), Some("foo"));
            assert_eq!(unq("E'foo'", standard).as_deref(), Some("foo"));
            assert_eq!(
                unq(r"E'a\n\t\a\b\0\z\'b'", standard).as_deref(),
                Some("a\n\t\u{7}\u{8}\0z'b")
            );
            assert_eq!(unq("$$$$", standard).as_deref(), Some(""));
            assert_eq!(unq("$$qw$e$z$$", standard).as_deref(), Some("qw$e$z"));
            assert_eq!(
                unq(r#"$qq$$aa$$$'"\\$qq$"#, standard).as_deref(),
                Some(r#"$aa$$$'"\\"#)
            );
        }
    }

    #[test]
    fn test_unquote_legacy_decodes_backslashes() {
        assert_eq!(unq(r"'a\\b\\c'", false).as_deref(), Some(r"a\b\c"));
        assert_eq!(unq(r"e'a\\b\\c'", false).as_deref(), Some(r"a\b\c"));
    }

    #[test]
    fn test_unquote_standard_keeps_backslashes() {
        assert_eq!(unq(r"'\\''z'", true).as_deref(), Some(r"\\'z"));
    }

    #[test]
    fn test_unquote_octal() {
        assert_eq!(unq(r"E'\101\1012'", false).as_deref(), Some("AA2"));
        assert_eq!(unq(r"E'\7'", false).as_deref(), Some("\u{7}"));
    }

    #[test]
    fn test_unquote_passthrough() {
        assert_eq!(unq("$1", false).as_deref(), Some("$1"));
        assert_eq!(unq("true", false).as_deref(), Some("true"));
        assert_eq!(unq("", false).as_deref(), Some(""));
    }

    #[test]
    fn test_unquote_errors() {
        for bad in [
            "'",
            "'abc",
            "E'abc",
            "$a$abc",
            "$$",
            "$a$",
            "$a$x$b$",
            r"E'abc\'",
            "'x''",
            "'a'b'",
            r"E'a'\'",
        ] {
            assert!(
                matches!(
                    unquote_literal(bad, false),
                    Err(Error::MalformedLiteral { .. })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_unquote_rejects_unpaired_quotes() {
        for standard in [false, true] {
            for bad in ["'x''", "'a'b'", "''''''x'", "'''"] {
                assert!(
                    matches!(
                        unquote_literal(bad, standard),
                        Err(Error::MalformedLiteral { .. })
                    ),
                    "{bad} should be rejected"
                );
            }
        }
        assert_eq!(unq(r"'a\''", false).as_deref(), Some("a'"));
        assert!(unquote_literal(r"'a\''", true).is_err());
        assert_eq!(unq(r"'a\'''", true).as_deref(), Some(r"a\'"));
        assert_eq!(unq(r"E'\\'''", true).as_deref(), Some(r"\'"));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(""), "");
        assert_eq!(unescape(r"\N"), "N");
        assert_eq!(unescape("abc"), "abc");
        assert_eq!(unescape(r"\0\000\001\01\1"), "\0\0\u{1}\u{1}\u{1}");
        assert_eq!(unescape(r"a\001b\tc\r\n"), "a\u{1}b\tc\r\n");
        assert_eq!(unescape("abc\\"), "abc\\");
    }

    #[test]
    fn test_dollar_tag_len() {
        assert_eq!(dollar_tag_len(b"$$"), Some(2));
        assert_eq!(dollar_tag_len(b"$tag$x"), Some(5));
        assert_eq!(dollar_tag_len(b"$_1$"), Some(4));
        assert_eq!(dollar_tag_len(b"$1$"), None);
        assert_eq!(dollar_tag_len(b"$a"), None);
        assert_eq!(dollar_tag_len(b"a$$"), None);
    }
}

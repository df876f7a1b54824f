//! One-dimensional PostgreSQL array literals.

use alloc::string::String;
use alloc::vec::Vec;

use super::literal::unescape;
use super::value::ToSqlText;
use crate::errors::Error;

/// Characters that never force an array element into double quotes.
fn is_plain_element_byte(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || b"_.%&=()<>*/+-".contains(&b)
}

fn push_element(out: &mut String, text: &str) {
    if text.is_empty() {
        out.push_str("\"\"");
    } else if text.bytes().all(is_plain_element_byte) && !text.eq_ignore_ascii_case("null") {
        out.push_str(text);
    } else {
        out.push('"');
        for c in text.chars() {
            if matches!(c, '"' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    }
}

/// Render values as a PostgreSQL array literal.
///
/// Elements containing anything but lower-case letters, digits and a few
/// safe punctuation characters are double-quoted with `"` and `\`
/// backslash-escaped. Text equal to `null` in any case is quoted so it is not
/// read back as `NULL`.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::make_pgarray;
///
/// assert_eq!(make_pgarray([Some("a"), None, Some("q,uoted"), Some("null")]), r#"{a,NULL,"q,uoted","null"}"#);
/// assert_eq!(make_pgarray(Vec::<&str>::new()), "{}");
/// ```
#[must_use]
pub fn make_pgarray<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: ToSqlText,
{
    let mut out = String::from("{");
    for (index, item) in items.into_iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        match item.to_sql_text() {
            None => out.push_str("NULL"),
            Some(text) => push_element(&mut out, &text),
        }
    }
    out.push('}');
    out
}

fn invalid<T>(reason: &'static str, pos: usize) -> Result<T, Error> {
    Err(Error::InvalidArrayFormat { reason, pos })
}

/// Parse a one-dimensional PostgreSQL array literal.
///
/// An optional dimension decoration (`[0:2]=`) is skipped. Unquoted `NULL`
/// (any case) becomes `None`; every other element is unescaped.
///
/// # Errors
///
/// Returns [`Error::InvalidArrayFormat`] when the braces are missing, an
/// element is empty or unterminated, or elements are not separated by `,`.
///
/// # Example
///
/// ```rust
/// use sql_fragments::quoting::parse_pgarray;
///
/// let items = parse_pgarray(r#"{a,b,null,"null","b\"b"}"#).unwrap();
/// assert_eq!(
///     items,
///     vec![Some("a".into()), Some("b".into()), None, Some("null".into()), Some("b\"b".into())]
/// );
/// ```
pub fn parse_pgarray(text: &str) -> Result<Vec<Option<String>>, Error> {
    let bytes = text.as_bytes();
    if !matches!(bytes.first(), Some(b'{' | b'[')) || bytes.last() != Some(&b'}') {
        return invalid("must be surrounded with {}", 0);
    }
    let end = bytes.len() - 1;
    let mut pos = if bytes[0] == b'[' {
        match text.find('{') {
            Some(open) => open + 1,
            None => return invalid("missing { after dimensions", 0),
        }
    } else {
        1
    };

    let mut items = Vec::new();
    if pos >= end {
        return Ok(items);
    }

    loop {
        let (item, next) = if bytes[pos] == b'"' {
            let mut i = pos + 1;
            while i < end {
                match bytes[i] {
                    b'\\' => i += 2,
                    b'"' => break,
                    _ => i += 1,
                }
            }
            if i >= end {
                return invalid("unterminated quoted element", pos);
            }
            (Some(unescape(&text[pos + 1..i])), i + 1)
        } else {
            let mut i = pos;
            while i < end && !matches!(bytes[i], b',' | b'"' | b'{' | b'}') {
                i += 1;
            }
            if i == pos {
                return invalid("empty element", pos);
            }
            let raw = &text[pos..i];
            let item = if raw.eq_ignore_ascii_case("null") {
                None
            } else {
                Some(unescape(raw))
            };
            (item, i)
        };
        items.push(item);

        if next == end {
            return Ok(items);
        }
        if bytes[next] != b',' {
            return invalid("expected , or }", next);
        }
        pos = next + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn owned(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|item| item.map(String::from)).collect()
    }

    #[test]
    fn test_make_pgarray() {
        assert_eq!(make_pgarray(Vec::<Option<&str>>::new()), "{}");
        assert_eq!(make_pgarray(["a", "b"]), "{a,b}");
        assert_eq!(make_pgarray([Some("a"), None]), "{a,NULL}");
        assert_eq!(make_pgarray([""]), "{\"\"}");
        assert_eq!(make_pgarray(["A b"]), "{\"A b\"}");
        assert_eq!(make_pgarray([r#"q"\"#]), r#"{"q\"\\"}"#);
        assert_eq!(make_pgarray(["NULL", "Null"]), r#"{"NULL","Null"}"#);
        assert_eq!(make_pgarray([1, 2, 3]), "{1,2,3}");
    }

    #[test]
    fn test_parse_pgarray() {
        assert_eq!(parse_pgarray("{}").unwrap(), owned(&[]));
        assert_eq!(
            parse_pgarray(r#"{a,b,null,"null"}"#).unwrap(),
            owned(&[Some("a"), Some("b"), None, Some("null")])
        );
        assert_eq!(
            parse_pgarray(r#"{"a,a","b\"b","c\\c"}"#).unwrap(),
            owned(&[Some("a,a"), Some("b\"b"), Some("c\\c")])
        );
        assert_eq!(
            parse_pgarray("[0,3]={1,2,3}").unwrap(),
            owned(&[Some("1"), Some("2"), Some("3")])
        );
        assert_eq!(parse_pgarray(r#"{""}"#).unwrap(), owned(&[Some("")]));
    }

    #[test]
    fn test_parse_pgarray_errors() {
        for bad in [
            "}{",
            "[1]=}",
            r#"{"..." , }"#,
            r#"{"..." ; }"#,
            r#"{"}"#,
            r#"{"..."}zzz"#,
            r#"{"..."}z"#,
            "{a,}",
            "{,a}",
            "{{1,2}}",
            "",
            "abc",
        ] {
            assert!(
                matches!(parse_pgarray(bad), Err(Error::InvalidArrayFormat { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_round_trip() {
        let items = vec![
            Some("plain"),
            None,
            Some(""),
            Some("null"),
            Some("with space"),
            Some("{braces}"),
            Some(r#"quote " and \ backslash"#),
            Some("ünicode"),
        ];
        let array = make_pgarray(items.iter().copied());
        assert_eq!(parse_pgarray(&array).unwrap(), owned(&items));
    }
}

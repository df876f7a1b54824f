//! Single-pass classification of the token at a cursor position.
//!
//! Rules are tried in a fixed priority order. A rule whose construct is not
//! terminated (string, quoted identifier, dollar quote, block comment) simply
//! does not match, and lower-priority rules get their turn; the last rule
//! accepts any single character, so scanning never fails.

use super::dialect::Dialect;
use super::token::{Token, TokenKind};
use crate::quoting::dollar_tag_len;

/// Scan the token starting at byte offset `position` of `source`.
///
/// Returns `None` at the end of input. `position` must be a character
/// boundary, which every token end is.
///
/// # Example
///
/// ```rust
/// use sql_fragments::{Dialect, TokenKind, next_token};
///
/// let sql = "select $1";
/// let token = next_token(sql, 6, Dialect::LEGACY).unwrap();
/// assert_eq!(token.kind, TokenKind::Whitespace);
/// let token = next_token(sql, token.end, Dialect::LEGACY).unwrap();
/// assert_eq!((token.kind, token.text), (TokenKind::NumberedParam, "$1"));
/// assert!(next_token(sql, token.end, Dialect::LEGACY).is_none());
/// ```
#[must_use]
pub fn next_token(source: &str, position: usize, dialect: Dialect) -> Option<Token<'_>> {
    if position >= source.len() {
        return None;
    }
    let (kind, end) = scan(source, position, dialect);
    debug_assert!(end > position, "every rule consumes at least one byte");
    Some(Token {
        kind,
        text: &source[position..end],
        start: position,
        end,
        location: None,
    })
}

fn scan(source: &str, pos: usize, dialect: Dialect) -> (TokenKind, usize) {
    let bytes = source.as_bytes();
    if let Some(end) = read_string(bytes, pos, dialect.standard_quoting) {
        return (TokenKind::StringLiteral, end);
    }
    if let Some(found) = read_identifier(bytes, pos, dialect.fully_qualified) {
        return found;
    }
    let rules: [(TokenKind, fn(&[u8], usize) -> Option<usize>); 5] = [
        (TokenKind::DollarQuotedLiteral, read_dollar_quoted),
        (TokenKind::Number, read_number),
        (TokenKind::NumberedParam, read_numbered_param),
        (TokenKind::OldStyleParam, read_old_style_param),
        (TokenKind::NewStyleParam, read_new_style_param),
    ];
    for (kind, rule) in &rules {
        if let Some(end) = rule(bytes, pos) {
            return (*kind, end);
        }
    }
    if let Some(end) = read_whitespace(source, pos) {
        return (TokenKind::Whitespace, end);
    }
    if let Some(end) = read_symbol(bytes, pos) {
        return (TokenKind::Symbol, end);
    }
    let width = source[pos..].chars().next().map_or(1, char::len_utf8);
    (TokenKind::Error, pos + width)
}

/// Scans a run opened by `quote` at `open`, honouring doubled quotes and,
/// when `backslashes` is set, backslash escapes.
///
/// An unterminated run that contained a doubled quote ends at the first
/// quote of the last pair, which is where a backtracking matcher would
/// close it.
fn read_quoted(bytes: &[u8], open: usize, quote: u8, backslashes: bool) -> Option<usize> {
    let mut i = open + 1;
    let mut last_pair = None;
    while i < bytes.len() {
        let b = bytes[i];
        if b == quote {
            if bytes.get(i + 1) == Some(&quote) {
                last_pair = Some(i);
                i += 2;
            } else {
                return Some(i + 1);
            }
        } else if backslashes && b == b'\\' {
            if i + 1 >= bytes.len() {
                break;
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    last_pair.map(|pair| pair + 1)
}

fn read_string(bytes: &[u8], pos: usize, standard_quoting: bool) -> Option<usize> {
    match bytes[pos] {
        b'\'' => read_quoted(bytes, pos, b'\'', !standard_quoting),
        b'E' | b'e' if bytes.get(pos + 1) == Some(&b'\'') => {
            read_quoted(bytes, pos + 1, b'\'', true)
        }
        _ => None,
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_cont(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Reads one bare or quoted name; the flag tells whether it was quoted.
fn read_name(bytes: &[u8], pos: usize) -> Option<(usize, bool)> {
    match *bytes.get(pos)? {
        b'"' => read_quoted(bytes, pos, b'"', false).map(|end| (end, true)),
        b if is_ident_start(b) => {
            let mut end = pos + 1;
            while end < bytes.len() && is_ident_cont(bytes[end]) {
                end += 1;
            }
            Some((end, false))
        }
        _ => None,
    }
}

fn read_identifier(bytes: &[u8], pos: usize, fully_qualified: bool) -> Option<(TokenKind, usize)> {
    let (mut end, quoted) = read_name(bytes, pos)?;
    let mut kind = if quoted {
        TokenKind::QuotedIdentifier
    } else {
        TokenKind::Identifier
    };
    if fully_qualified {
        // A dot is only part of the chain when a name follows it.
        while bytes.get(end) == Some(&b'.') {
            let Some((next, _)) = read_name(bytes, end + 1) else {
                break;
            };
            end = next;
            kind = TokenKind::QualifiedIdentifier;
        }
    }
    Some((kind, end))
}

fn read_dollar_quoted(bytes: &[u8], pos: usize) -> Option<usize> {
    let tag_len = dollar_tag_len(&bytes[pos..])?;
    let tag = &bytes[pos..pos + tag_len];
    let body = pos + tag_len;
    bytes[body..]
        .windows(tag_len)
        .position(|window| window == tag)
        .map(|offset| body + offset + tag_len)
}

fn read_number(bytes: &[u8], pos: usize) -> Option<usize> {
    if !bytes[pos].is_ascii_digit() {
        return None;
    }
    let mut end = pos + 1;
    while end < bytes.len() && matches!(bytes[end], b'0'..=b'9' | b'.' | b'e' | b'E') {
        end += 1;
    }
    Some(end)
}

fn read_digits(bytes: &[u8], start: usize) -> usize {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn read_numbered_param(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos] != b'$' {
        return None;
    }
    let end = read_digits(bytes, pos + 1);
    (end > pos + 1).then_some(end)
}

fn read_old_style_param(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos] != b'%' || bytes.get(pos + 1) != Some(&b'(') {
        return None;
    }
    let name_start = pos + 2;
    if !bytes.get(name_start).copied().is_some_and(is_ident_start) {
        return None;
    }
    let mut end = name_start + 1;
    while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'_') {
        end += 1;
    }
    match bytes.get(end..end + 2) {
        Some([b')', b's' | b'S']) => Some(end + 2),
        _ => None,
    }
}

fn read_new_style_param(bytes: &[u8], pos: usize) -> Option<usize> {
    if bytes[pos] != b'{' {
        return None;
    }
    let close = bytes[pos + 1..]
        .iter()
        .position(|&b| b == b'{' || b == b'}')?;
    (close > 0 && bytes[pos + 1 + close] == b'}').then_some(pos + close + 2)
}

fn read_whitespace(source: &str, pos: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let mut end = pos;
    loop {
        let rest = &source[end..];
        if rest.starts_with("--") {
            end += rest.find('\n').unwrap_or(rest.len());
        } else if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(close) => end += close + 4,
                None => break,
            }
        } else if let Some(c) = rest.chars().next().filter(|c| c.is_whitespace()) {
            end += c.len_utf8();
            while let Some(c) = source[end..].chars().next().filter(|c| c.is_whitespace()) {
                end += c.len_utf8();
            }
        } else {
            break;
        }
        if end >= bytes.len() {
            break;
        }
    }
    (end > pos).then_some(end)
}

fn is_operator_byte(b: u8) -> bool {
    b"-+*~!@#^&|?/%<>=".contains(&b)
}

fn read_symbol(bytes: &[u8], pos: usize) -> Option<usize> {
    let b = bytes[pos];
    if is_operator_byte(b) {
        let mut end = pos + 1;
        while end < bytes.len() && is_operator_byte(bytes[end]) {
            end += 1;
        }
        Some(end)
    } else if b",()[].:;".contains(&b) {
        Some(pos + 1)
    } else {
        None
    }
}

//! Property checks shared by the fuzz harnesses and the regression tests.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`test_tokenize`]: the scanner is total, lossless and deterministic
//! - [`test_literal_roundtrip`], [`test_ident_roundtrip`],
//!   [`test_array_roundtrip`], [`test_copy_roundtrip`]: quoting then
//!   unquoting returns the original value
//! - [`test_split_statements`]: statements are in-order slices separated
//!   only by whitespace and comments
//! - [`test_change_fragment`]: the fragment parser never panics, and what it
//!   accepts survives a rebuild through [`crate::builders`]
//! - [`run_crash_dir_regression`]: replay saved fuzzer inputs
//!
//! Every helper panics with a description of the broken property.

extern crate std;

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::builders::{delete_sql, insert_sql, update_sql};
use crate::fragment::{ChangeOp, ChangeRow, ParsedFragment, parse_change_fragment};
use crate::quoting::{
    make_pgarray, parse_pgarray, quote_copy, quote_fqident, quote_ident, quote_literal,
    unescape_copy, unquote_fqident, unquote_ident, unquote_literal,
};
use crate::statements::split_statements;
use crate::tokenizer::{Dialect, TokenKind, TokenizerOptions, tokenize};

/// Check the scanner invariants on arbitrary input.
///
/// # Panics
///
/// Panics if a token is empty, tokens are not contiguous, whitespace leaks
/// through `ignore_whitespace`, two scans differ, or (without
/// `ignore_whitespace`) the tokens do not concatenate back to the input.
pub fn test_tokenize(input: &str, options: TokenizerOptions) {
    let tokens: Vec<_> = tokenize(input, options).collect();
    let again: Vec<_> = tokenize(input, options).collect();
    assert_eq!(tokens, again, "tokenizing {input:?} is not deterministic");

    let mut previous_end = 0;
    for token in &tokens {
        assert!(!token.text.is_empty(), "empty token in {input:?}");
        assert_eq!(&input[token.start..token.end], token.text);
        assert!(token.start >= previous_end, "tokens out of order in {input:?}");
        if !options.ignore_whitespace {
            assert_eq!(token.start, previous_end, "gap before {token:?} in {input:?}");
        } else {
            assert_ne!(token.kind, TokenKind::Whitespace);
        }
        if options.show_location {
            let location = input[..token.end].chars().count();
            assert_eq!(token.location, Some(location), "{token:?} in {input:?}");
        }
        previous_end = token.end;
    }
    if !options.ignore_whitespace {
        assert_eq!(previous_end, input.len(), "tokens do not cover {input:?}");
    }
}

/// Check that a quoted literal unquotes to the value under both quoting
/// modes, and scans as a single token.
///
/// # Panics
///
/// Panics if any of those properties does not hold.
pub fn test_literal_roundtrip(value: Option<&str>) {
    let quoted = quote_literal(&value);
    for standard_quoting in [false, true] {
        let unquoted = unquote_literal(&quoted, standard_quoting)
            .unwrap_or_else(|error| panic!("{quoted:?} does not unquote: {error}"));
        assert_eq!(unquoted.as_deref(), value, "literal {quoted:?}");

        let dialect = Dialect::LEGACY.with_standard_quoting(standard_quoting);
        let tokens: Vec<_> = tokenize(&quoted, TokenizerOptions::default().with_dialect(dialect))
            .map(|token| token.kind)
            .collect();
        let expected = if value.is_some() {
            TokenKind::StringLiteral
        } else {
            TokenKind::Identifier
        };
        assert_eq!(tokens, [expected], "literal {quoted:?} scans as {tokens:?}");
    }
}

/// Check that identifier quoting round-trips, alone and schema-qualified.
///
/// # Panics
///
/// Panics if unquoting fails or returns another name, or the quoted name
/// does not scan as a single identifier token.
pub fn test_ident_roundtrip(name: &str) {
    let quoted = quote_ident(name);
    assert_eq!(unquote_ident(&quoted).as_deref(), Ok(name), "identifier {quoted:?}");
    let kinds: Vec<_> = tokenize(&quoted, TokenizerOptions::default())
        .map(|token| token.kind)
        .collect();
    assert!(
        matches!(
            kinds.as_slice(),
            [TokenKind::Identifier | TokenKind::QuotedIdentifier]
        ),
        "identifier {quoted:?} scans as {kinds:?}"
    );

    if !name.contains('.') {
        let qualified = quote_fqident(&format!("Schema.{name}"));
        assert_eq!(
            unquote_fqident(&qualified),
            Ok(format!("Schema.{name}")),
            "qualified identifier {qualified:?}"
        );
        let options = TokenizerOptions::default().with_fully_qualified(true);
        let kinds: Vec<_> = tokenize(&qualified, options)
            .map(|token| token.kind)
            .collect();
        assert_eq!(kinds, [TokenKind::QualifiedIdentifier], "{qualified:?}");
    }
}

/// Check that an array literal parses back to its elements.
///
/// # Panics
///
/// Panics if parsing fails or returns other elements.
pub fn test_array_roundtrip(items: &[Option<String>]) {
    let literal = make_pgarray(items);
    let parsed = parse_pgarray(&literal)
        .unwrap_or_else(|error| panic!("{literal:?} does not parse: {error}"));
    assert_eq!(parsed, items, "array {literal:?}");
}

/// Check that a COPY field decodes back to the value.
///
/// # Panics
///
/// Panics if the decoded field differs.
pub fn test_copy_roundtrip(value: Option<&str>) {
    let field = quote_copy(&value);
    assert_eq!(unescape_copy(&field).as_deref(), value, "COPY field {field:?}");
}

/// Check the splitter invariants on arbitrary input.
///
/// # Panics
///
/// Panics if a statement is empty, statements overlap or come out of order,
/// anything but whitespace separates them, or the iterator yields after an
/// error.
pub fn test_split_statements(input: &str, standard_quoting: bool) {
    let base = input.as_ptr() as usize;
    let mut previous_end = 0;
    let mut statements = split_statements(input, standard_quoting);
    let dialect = Dialect::LEGACY.with_standard_quoting(standard_quoting);
    let options = TokenizerOptions::default().with_dialect(dialect);

    for statement in statements.by_ref() {
        let Ok(statement) = statement else {
            break;
        };
        assert!(!statement.is_empty(), "empty statement in {input:?}");
        assert!(
            tokenize(statement, options).next().is_some_and(|token| !token.is_whitespace()),
            "statement {statement:?} starts with whitespace"
        );
        let start = statement.as_ptr() as usize - base;
        assert!(start >= previous_end, "statements overlap in {input:?}");
        let gap = &input[previous_end..start];
        assert!(
            tokenize(gap, options).all(|token| token.is_whitespace()),
            "{gap:?} skipped between statements of {input:?}"
        );
        previous_end = start + statement.len();
    }
    assert!(statements.next().is_none(), "statements after an error in {input:?}");
}

/// Check that the fragment parser does not panic, and that a merged row it
/// accepts is reproduced when rebuilt into a statement and parsed again.
///
/// # Panics
///
/// Panics if the rebuilt fragment parses to a different row.
pub fn test_change_fragment(op: ChangeOp, sql: &str, split_keys: bool) {
    let Ok(parsed) = parse_change_fragment(op, sql, split_keys) else {
        return;
    };
    let row = match parsed {
        ParsedFragment::Merged(row) => row,
        ParsedFragment::Split { keys, data } => {
            assert!(
                op != ChangeOp::Insert || keys.is_empty(),
                "insert {sql:?} has key columns"
            );
            assert!(
                op != ChangeOp::Delete || data.is_empty(),
                "delete {sql:?} has data columns"
            );
            return;
        }
    };
    let pkeys: Vec<&str> = match op {
        ChangeOp::Insert => Vec::new(),
        // Key columns come last in a merged row.
        ChangeOp::Update => row.keys().last().map(String::as_str).into_iter().collect(),
        ChangeOp::Delete => row.keys().map(String::as_str).collect(),
    };
    test_fragment_roundtrip(op, &row, &pkeys);
}

/// Check that a row rendered as a statement parses back from its fragment.
///
/// The statement is built for table `t` and the table prefix and trailing
/// semicolon are stripped, leaving what a change-capture trigger logs. Key
/// columns must be a suffix of the row for an update, and the whole row for
/// a delete.
///
/// # Panics
///
/// Panics if the fragment does not parse back into `row`.
pub fn test_fragment_roundtrip(op: ChangeOp, row: &ChangeRow, pkeys: &[&str]) {
    let (statement, prefix) = match op {
        ChangeOp::Insert => (insert_sql(row, "t"), "insert into public.t "),
        ChangeOp::Update => (
            update_sql(row, "t", pkeys).unwrap_or_else(|error| panic!("{error}")),
            "update only public.t set ",
        ),
        ChangeOp::Delete => (
            delete_sql(row, "t", pkeys).unwrap_or_else(|error| panic!("{error}")),
            "delete from only public.t where ",
        ),
    };
    let fragment = statement
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(';'))
        .unwrap_or_else(|| panic!("unexpected statement shape {statement:?}"));
    match parse_change_fragment(op, fragment, false) {
        Ok(ParsedFragment::Merged(parsed)) => {
            assert_eq!(&parsed, row, "fragment {fragment:?}");
            assert!(
                parsed.keys().eq(row.keys()),
                "column order changed for fragment {fragment:?}"
            );
        }
        other => panic!("fragment {fragment:?} parsed as {other:?}"),
    }
}

/// Replay every saved fuzzer input of a harness through `check`.
///
/// New `.fuzz` files found in `workspace_dir` (the honggfuzz workspace of the
/// harness) are first copied into `crash_dir`. Missing directories are
/// treated as empty.
///
/// # Panics
///
/// Panics if `check` panics, a file cannot be read or copied, or an input
/// takes longer than `time_limit`.
pub fn run_crash_dir_regression(
    crash_dir: &str,
    workspace_dir: &str,
    time_limit: Duration,
    check: impl Fn(&[u8]),
) {
    let crash_dir = Path::new(crash_dir);
    if let Ok(entries) = std::fs::read_dir(workspace_dir) {
        std::fs::create_dir_all(crash_dir).unwrap_or_else(|error| panic!("{error}"));
        for path in entries.filter_map(Result::ok).map(|entry| entry.path()) {
            let (Some(name), Some("fuzz")) = (
                path.file_name(),
                path.extension().and_then(|ext| ext.to_str()),
            ) else {
                continue;
            };
            let target = crash_dir.join(name);
            if !target.exists() {
                std::fs::copy(&path, &target).unwrap_or_else(|error| panic!("{error}"));
            }
        }
    }

    let Ok(entries) = std::fs::read_dir(crash_dir) else {
        return;
    };
    let mut paths: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();
    for path in paths {
        let data = std::fs::read(&path).unwrap_or_else(|error| panic!("{error}"));
        let started = Instant::now();
        check(&data);
        let elapsed = started.elapsed();
        assert!(
            elapsed <= time_limit,
            "{} took {elapsed:?}, over the {time_limit:?} limit",
            path.display()
        );
    }
}

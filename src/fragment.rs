//! Reconstruction of row data from partial SQL written by change-capture triggers.
//!
//! A trigger logs each row change as an operation tag plus the tail of the
//! statement that would replay it:
//!
//! | tag | fragment |
//! |-----|----------|
//! | `I` | `(id, data) values (1, null)` |
//! | `U` | `data = 'foo' where id = 1` |
//! | `D` | `id = 1 and id2 = 'str''val'` |
//!
//! [`parse_change_fragment`] turns such a fragment back into column names
//! and unquoted values.

use alloc::borrow::Cow;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap as IndexMapRaw;
use tracing::debug;

use crate::errors::Error;
use crate::quoting::{unquote_ident, unquote_literal};
use crate::tokenizer::{Token, TokenKind, Tokens, TokenizerOptions, tokenize};

/// Column name to value mapping, in the order the columns appear in the fragment.
///
/// `None` stands for SQL `NULL`.
pub type ChangeRow = IndexMapRaw<String, Option<String>, hashbrown::DefaultHashBuilder>;

/// The kind of row change a fragment describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub enum ChangeOp {
    /// `I`: a column list and a value list.
    Insert,
    /// `U`: assignments, then a `WHERE` key predicate.
    Update,
    /// `D`: a key predicate.
    Delete,
}

impl ChangeOp {
    /// The single-letter tag of the operation.
    #[must_use]
    pub fn tag(self) -> char {
        match self {
            ChangeOp::Insert => 'I',
            ChangeOp::Update => 'U',
            ChangeOp::Delete => 'D',
        }
    }
}

impl TryFrom<char> for ChangeOp {
    type Error = Error;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag {
            'I' => Ok(ChangeOp::Insert),
            'U' => Ok(ChangeOp::Update),
            'D' => Ok(ChangeOp::Delete),
            other => Err(Error::UnknownOperation(other)),
        }
    }
}

impl fmt::Display for ChangeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Row data recovered from a fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFragment {
    /// Data columns followed by key columns.
    Merged(ChangeRow),
    /// Key columns (the `WHERE` predicate) apart from data columns.
    Split {
        /// Columns identifying the row.
        keys: ChangeRow,
        /// Columns carrying new data.
        data: ChangeRow,
    },
}

impl ParsedFragment {
    /// The merged row, if the fragment was parsed without key splitting.
    #[must_use]
    pub fn as_merged(&self) -> Option<&ChangeRow> {
        match self {
            ParsedFragment::Merged(row) => Some(row),
            ParsedFragment::Split { .. } => None,
        }
    }
}

/// Parse a trigger fragment back into row data.
///
/// The fragment is scanned with backslash-escaping string literals, as the
/// triggers write them. Column names are unquoted with
/// [`unquote_ident`] and values with [`unquote_literal`]. Values must be
/// plain literals or bare words such as `null`; expressions are rejected.
///
/// With `split_keys` the key columns of an update or delete are returned
/// apart from the data columns, and a column may appear in both, as it does
/// when an update changes the primary key.
///
/// # Errors
///
/// - [`Error::Syntax`] when a token does not fit the grammar, including a
///   column list and value list of different length, `OR`, `IS NULL` and
///   anything after the end of the fragment;
/// - [`Error::UnexpectedEnd`] when the fragment stops mid-grammar;
/// - [`Error::DuplicateColumn`] when a column repeats within the data or the
///   key columns, or appears in both without `split_keys`;
/// - [`Error::MalformedIdentifier`] or [`Error::MalformedLiteral`] from
///   unquoting.
///
/// # Example
///
/// ```rust
/// use sql_fragments::{ChangeOp, ParsedFragment, parse_change_fragment};
///
/// let parsed = parse_change_fragment(ChangeOp::Update, "data='foo' where id = 1", false).unwrap();
/// let row = parsed.as_merged().unwrap();
/// assert_eq!(row["data"].as_deref(), Some("foo"));
/// assert_eq!(row["id"].as_deref(), Some("1"));
///
/// let op = ChangeOp::try_from('I').unwrap();
/// let ParsedFragment::Split { keys, data } =
///     parse_change_fragment(op, "(id, data) values (1, null)", true).unwrap()
/// else {
///     unreachable!()
/// };
/// assert!(keys.is_empty());
/// assert_eq!(data["data"], None);
/// ```
pub fn parse_change_fragment(
    op: ChangeOp,
    sql: &str,
    split_keys: bool,
) -> Result<ParsedFragment, Error> {
    parse_fragment(op, sql, split_keys).inspect_err(|error| {
        debug!(%op, %error, "rejecting change fragment");
    })
}

fn parse_fragment(op: ChangeOp, sql: &str, split_keys: bool) -> Result<ParsedFragment, Error> {
    let mut parser = FragmentParser::new(sql);
    let mut data = Pairs::default();
    let mut keys = Pairs::default();
    match op {
        ChangeOp::Insert => parser.parse_insert(&mut data)?,
        ChangeOp::Update => {
            parser.parse_assignments(&mut data)?;
            parser.parse_predicate(&mut keys)?;
        }
        ChangeOp::Delete => parser.parse_predicate(&mut keys)?,
    }

    let data = data.into_row()?;
    let keys = keys.into_row()?;
    if split_keys {
        return Ok(ParsedFragment::Split { keys, data });
    }
    let mut merged = data;
    for (column, value) in keys {
        if merged.contains_key(&column) {
            return Err(Error::DuplicateColumn(column));
        }
        merged.insert(column, value);
    }
    Ok(ParsedFragment::Merged(merged))
}

/// Raw column and value tokens in source order.
#[derive(Default)]
struct Pairs<'input> {
    columns: Vec<&'input str>,
    values: Vec<&'input str>,
}

impl Pairs<'_> {
    fn into_row(self) -> Result<ChangeRow, Error> {
        let mut row = ChangeRow::with_capacity_and_hasher(
            self.columns.len(),
            hashbrown::DefaultHashBuilder::default(),
        );
        for (column, value) in self.columns.into_iter().zip(self.values) {
            let column = unquote_ident(column)?.into_owned();
            let value = unquote_literal(value, false)?.map(Cow::into_owned);
            if row.contains_key(&column) {
                return Err(Error::DuplicateColumn(column));
            }
            row.insert(column, value);
        }
        Ok(row)
    }
}

struct FragmentParser<'input> {
    tokens: Tokens<'input>,
}

impl<'input> FragmentParser<'input> {
    fn new(sql: &'input str) -> Self {
        Self {
            tokens: tokenize(sql, TokenizerOptions::default().with_ignore_whitespace(true)),
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<Token<'input>, Error> {
        self.tokens.next().ok_or(Error::UnexpectedEnd { expected })
    }

    fn expect_symbol(&mut self, symbol: &'static str) -> Result<(), Error> {
        let token = self.next(symbol)?;
        if token.is_symbol(symbol) {
            Ok(())
        } else {
            Err(syntax(symbol, &token))
        }
    }

    fn expect_keyword(&mut self, keyword: &'static str) -> Result<(), Error> {
        let token = self.next(keyword)?;
        if token.is_keyword(keyword) {
            Ok(())
        } else {
            Err(syntax(keyword, &token))
        }
    }

    fn column(&mut self) -> Result<&'input str, Error> {
        const EXPECTED: &str = "column name";
        let token = self.next(EXPECTED)?;
        if token.kind.is_identifier() {
            Ok(token.text)
        } else {
            Err(syntax(EXPECTED, &token))
        }
    }

    fn value(&mut self) -> Result<&'input str, Error> {
        const EXPECTED: &str = "literal value";
        let token = self.next(EXPECTED)?;
        if token.kind.is_literal() || token.kind == TokenKind::Identifier {
            Ok(token.text)
        } else {
            Err(syntax(EXPECTED, &token))
        }
    }

    fn end(&mut self) -> Result<(), Error> {
        match self.tokens.next() {
            None => Ok(()),
            Some(token) => Err(syntax("end of fragment", &token)),
        }
    }

    /// `( col [, col]* ) values ( val [, val]* )`
    fn parse_insert(&mut self, data: &mut Pairs<'input>) -> Result<(), Error> {
        self.expect_symbol("(")?;
        loop {
            data.columns.push(self.column()?);
            let token = self.next("',' or ')'")?;
            if token.is_symbol(")") {
                break;
            }
            if !token.is_symbol(",") {
                return Err(syntax("',' or ')'", &token));
            }
        }
        self.expect_keyword("values")?;
        self.expect_symbol("(")?;
        for remaining in (0..data.columns.len()).rev() {
            data.values.push(self.value()?);
            self.expect_symbol(if remaining == 0 { ")" } else { "," })?;
        }
        self.end()
    }

    /// `col = val [, col = val]* where`
    fn parse_assignments(&mut self, data: &mut Pairs<'input>) -> Result<(), Error> {
        loop {
            self.parse_pair(data)?;
            let token = self.next("',' or WHERE")?;
            if token.is_keyword("where") {
                return Ok(());
            }
            if !token.is_symbol(",") {
                return Err(syntax("',' or WHERE", &token));
            }
        }
    }

    /// `col = val [and col = val]*` up to the end of the fragment.
    fn parse_predicate(&mut self, keys: &mut Pairs<'input>) -> Result<(), Error> {
        loop {
            self.parse_pair(keys)?;
            match self.tokens.next() {
                None => return Ok(()),
                Some(token) if token.is_keyword("and") => {}
                Some(token) => return Err(syntax("AND or end of fragment", &token)),
            }
        }
    }

    fn parse_pair(&mut self, pairs: &mut Pairs<'input>) -> Result<(), Error> {
        pairs.columns.push(self.column()?);
        self.expect_symbol("=")?;
        pairs.values.push(self.value()?);
        Ok(())
    }
}

fn syntax(expected: &'static str, found: &Token<'_>) -> Error {
    Error::Syntax {
        expected,
        found: found.text.to_string(),
    }
}

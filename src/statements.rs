//! Splitting multi-statement SQL text into single statements.

use core::iter::FusedIterator;

use alloc::string::ToString;
use tracing::{debug, trace};

use crate::errors::Error;
use crate::tokenizer::{Dialect, Tokens, TokenizerOptions, tokenize};

/// Split `sql` into statements at top-level semicolons.
///
/// Statements are slices of the input: whitespace and comments before a
/// statement are skipped, everything else up to and including the closing
/// `;` is kept verbatim. Semicolons inside literals, comments or
/// parentheses do not end a statement. A trailing statement without `;` is
/// yielded as-is.
///
/// # Errors
///
/// Each item is a `Result`, and the iterator stops after the first error:
///
/// - [`Error::UnsupportedConstruct`] for `COPY ... FROM STDIN`, whose data
///   follows the statement and cannot be split;
/// - [`Error::UnbalancedParenthesis`] when parentheses do not balance at the
///   end of the input. It is reported instead of the trailing statement.
///
/// # Example
///
/// ```rust
/// use sql_fragments::split_statements;
///
/// let statements: Result<Vec<_>, _> =
///     split_statements("begin; select 1; select 'foo'; end;", false).collect();
/// assert_eq!(statements.unwrap(), ["begin;", "select 1;", "select 'foo';", "end;"]);
///
/// let statements: Result<Vec<_>, _> =
///     split_statements("select (select 2+(select 3;);) ; select 4;", false).collect();
/// assert_eq!(statements.unwrap(), ["select (select 2+(select 3;);) ;", "select 4;"]);
/// ```
#[must_use]
pub fn split_statements(sql: &str, standard_quoting: bool) -> Statements<'_> {
    let dialect = Dialect::LEGACY.with_standard_quoting(standard_quoting);
    let options = TokenizerOptions::default().with_dialect(dialect);
    Statements {
        source: sql,
        dialect,
        tokens: tokenize(sql, options),
        start: None,
        depth: 0,
        finished: false,
    }
}

/// Iterator over the statements of a SQL text, created by [`split_statements`].
#[derive(Debug, Clone)]
pub struct Statements<'input> {
    source: &'input str,
    dialect: Dialect,
    tokens: Tokens<'input>,
    start: Option<usize>,
    depth: i64,
    finished: bool,
}

impl<'input> Iterator for Statements<'input> {
    type Item = Result<&'input str, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        for token in self.tokens.by_ref() {
            let start = match self.start {
                Some(start) => start,
                None if token.is_whitespace() => continue,
                None => *self.start.insert(token.start),
            };
            if token.is_symbol("(") {
                self.depth += 1;
            } else if token.is_symbol(")") {
                self.depth -= 1;
            } else if token.is_symbol(";") && self.depth == 0 {
                self.start = None;
                let checked = check_statement(&self.source[start..token.end], self.dialect);
                self.finished = checked.is_err();
                return Some(checked);
            }
        }

        self.finished = true;
        if self.depth != 0 {
            debug!(depth = self.depth, "unbalanced parenthesis at end of input");
            return Some(Err(Error::UnbalancedParenthesis { depth: self.depth }));
        }
        self.start
            .take()
            .map(|start| check_statement(&self.source[start..], self.dialect))
    }
}

impl FusedIterator for Statements<'_> {}

fn check_statement(statement: &str, dialect: Dialect) -> Result<&str, Error> {
    if is_copy_from_stdin(statement, dialect) {
        debug!(statement, "rejecting COPY FROM STDIN");
        return Err(Error::UnsupportedConstruct(statement.to_string()));
    }
    trace!(statement, "split statement");
    Ok(statement)
}

/// Whether the statement is `copy ... from stdin`, ignoring ASCII case.
///
/// Works on tokens, so `from` may follow on any line and text inside
/// literals or comments never matches.
fn is_copy_from_stdin(statement: &str, dialect: Dialect) -> bool {
    let options = TokenizerOptions::default()
        .with_dialect(dialect)
        .with_ignore_whitespace(true);
    let mut tokens = tokenize(statement, options);
    if !tokens.next().is_some_and(|token| token.is_keyword("copy")) {
        return false;
    }
    let mut after_from = false;
    tokens.any(|token| {
        let found = after_from && token.is_keyword("stdin");
        after_from = token.is_keyword("from");
        found
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    fn split(sql: &str) -> Result<Vec<&str>, Error> {
        split_statements(sql, false).collect()
    }

    #[test]
    fn test_simple_statements() {
        assert_eq!(
            split("begin; select 1; select 'foo'; end;").unwrap(),
            ["begin;", "select 1;", "select 'foo';", "end;"]
        );
    }

    #[test]
    fn test_nested_semicolons() {
        assert_eq!(
            split("select (select 2+(select 3;);) ; select 4;").unwrap(),
            ["select (select 2+(select 3;);) ;", "select 4;"]
        );
    }

    #[test]
    fn test_literals_and_comments_hide_semicolons() {
        assert_eq!(
            split("-- lead;\n select ';' /* ; */, $$;$$; \n\n").unwrap(),
            ["select ';' /* ; */, $$;$$;"]
        );
    }

    #[test]
    fn test_trailing_statement_without_semicolon() {
        assert_eq!(split("a; b").unwrap(), ["a;", "b"]);
        assert_eq!(split("  ").unwrap(), Vec::<&str>::new());
        assert_eq!(split("").unwrap(), Vec::<&str>::new());
    }

    #[test]
    fn test_standard_quoting() {
        let sql = r"select 'a\'; select 'b';";
        let standard: Vec<&str> = split_statements(sql, true)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(standard, [r"select 'a\';", "select 'b';"]);
        let legacy = split(sql).unwrap();
        assert_eq!(legacy, [sql]);
    }

    #[test]
    fn test_unbalanced_parenthesis() {
        assert_eq!(
            split("select ());"),
            Err(Error::UnbalancedParenthesis { depth: -1 })
        );
        let mut statements = split_statements("select 1; select (2", false);
        assert_eq!(statements.next(), Some(Ok("select 1;")));
        assert_eq!(
            statements.next(),
            Some(Err(Error::UnbalancedParenthesis { depth: 1 }))
        );
        assert_eq!(statements.next(), None);
    }

    #[test]
    fn test_copy_from_stdin() {
        assert_eq!(
            split("copy from stdin;"),
            Err(Error::UnsupportedConstruct("copy from stdin;".into()))
        );
        let mut statements = split_statements("COPY t (a) FROM\n  STDIN; select 1;", false);
        assert!(matches!(
            statements.next(),
            Some(Err(Error::UnsupportedConstruct(_)))
        ));
        assert_eq!(statements.next(), None);
    }

    #[test]
    fn test_copy_from_stdin_across_lines() {
        for sql in [
            "copy t\nfrom stdin;",
            "copy t (a,\n b) from stdin;",
            "COPY t (a)\n  FROM\n  STDIN",
            "copy t from -- data follows\n stdin;",
        ] {
            assert_eq!(
                split(sql),
                Err(Error::UnsupportedConstruct(sql.into())),
                "{sql:?}"
            );
        }
    }

    #[test]
    fn test_copy_variants_allowed() {
        assert_eq!(
            split("copy t to stdout; copy t from '/tmp/x';").unwrap(),
            ["copy t to stdout;", "copy t from '/tmp/x';"]
        );
        assert_eq!(
            split("copy (select 'from stdin') to stdout;").unwrap(),
            ["copy (select 'from stdin') to stdout;"]
        );
        assert!(!is_copy_from_stdin("select 1 from stdin", Dialect::LEGACY));
        assert!(!is_copy_from_stdin("copyfrom stdin", Dialect::LEGACY));
        assert!(!is_copy_from_stdin("copy t from stdin_t", Dialect::LEGACY));
        assert!(!is_copy_from_stdin("copy t from /* stdin */ 'f'", Dialect::LEGACY));
    }
}

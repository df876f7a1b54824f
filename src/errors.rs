//! Submodule defining the errors used across the crate.

use alloc::string::String;

/// Errors raised while unquoting, splitting or reconstructing SQL text.
///
/// Every variant carries enough of the offending input to be logged by the
/// caller; nothing is retried or silently repaired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A quoted literal is unterminated, has a mismatched dollar tag or a bad escape.
    #[error("Malformed literal {literal:?}: {reason}")]
    MalformedLiteral {
        /// The literal as it was given.
        literal: String,
        /// What is wrong with it.
        reason: &'static str,
    },
    /// A double quote appears where an identifier cannot contain one.
    #[error("Malformed identifier {0:?}")]
    MalformedIdentifier(String),
    /// A token that does not fit the grammar at this position.
    #[error("Syntax error: expected {expected}, got {found:?}")]
    Syntax {
        /// What the grammar expected.
        expected: &'static str,
        /// The text of the offending token.
        found: String,
    },
    /// The token stream ended before the grammar was complete.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEnd {
        /// What the grammar expected.
        expected: &'static str,
    },
    /// Input ended with open (positive) or excess closing (negative) parentheses.
    #[error("Unbalanced parenthesis (depth {depth} at end of input)")]
    UnbalancedParenthesis {
        /// Nesting depth left at end of input.
        depth: i64,
    },
    /// A statement that cannot be delimited by the splitter, such as `COPY ... FROM STDIN`.
    #[error("Unsupported construct: {0}")]
    UnsupportedConstruct(String),
    /// A PostgreSQL array literal that cannot be parsed.
    #[error("Invalid array format at position {pos}: {reason}")]
    InvalidArrayFormat {
        /// What is wrong with it.
        reason: &'static str,
        /// Byte offset where the problem was detected.
        pos: usize,
    },
    /// The same column appears twice where names must be unique.
    #[error("Duplicate column name: {0}")]
    DuplicateColumn(String),
    /// A change operation tag other than `I`, `U` or `D`.
    #[error("Unknown change operation {0:?}, expected one of 'I', 'U', 'D'")]
    UnknownOperation(char),
    /// An UPDATE or DELETE was requested without key columns.
    #[error("{statement} needs at least one key column")]
    MissingKeys {
        /// The statement type.
        statement: &'static str,
    },
    /// A key column that the row does not contain.
    #[error("Unknown column name: {0}")]
    UnknownColumn(String),
    /// A named placeholder without a matching parameter.
    #[error("No value for parameter {0:?}")]
    MissingParameter(String),
    /// Positional placeholders and parameters differ in number.
    #[error("Statement has {expected} placeholders but {found} parameters were given")]
    ParameterCount {
        /// Number of placeholders in the statement.
        expected: usize,
        /// Number of parameters supplied.
        found: usize,
    },
    /// A `%` that does not start `%s`, `%(name)s` or `%%`.
    #[error("Malformed placeholder at position {pos}")]
    MalformedPlaceholder {
        /// Byte offset of the `%`.
        pos: usize,
    },
}

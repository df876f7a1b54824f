//! Lexical scanning of PostgreSQL-flavoured SQL text.
//!
//! The scanner classifies the text at a position into a single [`Token`]
//! borrowing from the input. It never fails: characters no rule accepts
//! become one-character [`TokenKind::Error`] tokens, and the tokens of any
//! input concatenate back to that input.
//!
//! ```rust
//! use sql_fragments::{TokenKind, TokenizerOptions, tokenize};
//!
//! let options = TokenizerOptions::default().with_ignore_whitespace(true);
//! let tokens: Vec<_> = tokenize("select 'a''b', $1", options)
//!     .map(|token| (token.kind, token.text))
//!     .collect();
//! assert_eq!(
//!     tokens,
//!     [
//!         (TokenKind::Identifier, "select"),
//!         (TokenKind::StringLiteral, "'a''b'"),
//!         (TokenKind::Symbol, ","),
//!         (TokenKind::NumberedParam, "$1"),
//!     ]
//! );
//! ```

mod dialect;
mod scanner;
mod token;

use core::iter::FusedIterator;

pub use dialect::{Dialect, TokenizerOptions};
pub use scanner::next_token;
pub use token::{Token, TokenKind};

/// Tokenize `sql` with the given options.
#[must_use]
pub fn tokenize(sql: &str, options: TokenizerOptions) -> Tokens<'_> {
    Tokens {
        source: sql,
        pos: 0,
        chars: 0,
        options,
    }
}

/// Iterator over the tokens of a SQL text, created by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'input> {
    source: &'input str,
    pos: usize,
    chars: usize,
    options: TokenizerOptions,
}

impl<'input> Tokens<'input> {
    /// The text not yet scanned.
    #[must_use]
    pub fn remainder(&self) -> &'input str {
        &self.source[self.pos..]
    }

    /// Byte offset of the scan cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'input> Iterator for Tokens<'input> {
    type Item = Token<'input>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let mut token = next_token(self.source, self.pos, self.options.dialect)?;
            self.pos = token.end;
            if self.options.show_location {
                self.chars += token.text.chars().count();
                token.location = Some(self.chars);
            }
            if self.options.ignore_whitespace && token.is_whitespace() {
                continue;
            }
            return Some(token);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.source.len() - self.pos;
        (0, Some(rest))
    }
}

impl FusedIterator for Tokens<'_> {}

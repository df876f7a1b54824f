#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod builders;
pub mod errors;
pub mod fragment;
pub mod quoting;
pub mod statements;
#[cfg(feature = "testing")]
pub mod testing;
pub mod tokenizer;

// Re-export main types
pub use fragment::{ChangeOp, ChangeRow, ParsedFragment, parse_change_fragment};
pub use quoting::{
    Params, ToSqlText, quote_fqident, quote_ident, quote_literal, quote_statement,
    unquote_fqident, unquote_ident, unquote_literal,
};
pub use statements::{Statements, split_statements};
pub use tokenizer::{Dialect, Token, TokenKind, TokenizerOptions, Tokens, next_token, tokenize};

// Re-export errors
pub use errors::Error;

//! Lossless conversion between values and their SQL, COPY, array and JSON text forms.
//!
//! Everything here is a pure function. Quoting output is what a
//! PostgreSQL-compatible lexer accepts, and each unquoting function inverts
//! its quoting counterpart exactly:
//!
//! ```rust
//! use sql_fragments::quoting::{quote_ident, quote_literal, unquote_ident, unquote_literal};
//!
//! let text = "it's a \\ path\n";
//! let quoted = quote_literal(text);
//! assert_eq!(unquote_literal(&quoted, false).unwrap().as_deref(), Some(text));
//!
//! assert_eq!(unquote_ident(&quote_ident("Mixed Case")).unwrap(), "Mixed Case");
//! ```

mod array;
mod copy;
mod ident;
mod json;
mod keywords;
mod literal;
mod statement;
mod value;

pub use array::{make_pgarray, parse_pgarray};
pub use copy::{
    COPY_NULL, quote_bytea_copy, quote_bytea_literal, quote_bytea_raw, quote_copy, unescape_copy,
};
pub use ident::{
    DEFAULT_SCHEMA, fq_name, fq_name_parts, quote_fqident, quote_ident, unquote_fqident,
    unquote_ident,
};
pub use json::quote_json;
pub(crate) use literal::dollar_tag_len;
pub use literal::{quote_literal, unescape, unquote_literal};
pub use statement::{Params, quote_statement};
pub use value::ToSqlText;

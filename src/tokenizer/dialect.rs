//! Token-grammar variants and tokenizer options.

/// Quoting and identifier-joining rules of a scan.
///
/// The two flags select one of four grammars, fixed for the whole scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub struct Dialect {
    /// `'...'` strings only escape quotes by doubling (`standard_conforming_strings = on`);
    /// backslash escapes need the `E'...'` form. When off, every string
    /// literal honours backslash escapes.
    pub standard_quoting: bool,
    /// Dotted identifier chains such as `schema."table"` lex as one token.
    pub fully_qualified: bool,
}

impl Dialect {
    /// Backslash-escaping strings, separate identifier tokens.
    pub const LEGACY: Self = Self {
        standard_quoting: false,
        fully_qualified: false,
    };

    /// Standard-conforming strings, separate identifier tokens.
    pub const STANDARD: Self = Self {
        standard_quoting: true,
        fully_qualified: false,
    };

    /// Returns the dialect with standard-conforming strings switched on or off.
    #[must_use]
    pub fn with_standard_quoting(mut self, standard_quoting: bool) -> Self {
        self.standard_quoting = standard_quoting;
        self
    }

    /// Returns the dialect with identifier-chain folding switched on or off.
    #[must_use]
    pub fn with_fully_qualified(mut self, fully_qualified: bool) -> Self {
        self.fully_qualified = fully_qualified;
        self
    }
}

/// Options of a [`tokenize`](crate::tokenize) run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub struct TokenizerOptions {
    /// The grammar variant.
    pub dialect: Dialect,
    /// Drop whitespace and comment tokens from the output.
    pub ignore_whitespace: bool,
    /// Fill [`Token::location`](crate::Token::location).
    pub show_location: bool,
}

impl TokenizerOptions {
    /// Returns the options with the given dialect.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Returns the options with standard-conforming strings switched on or off.
    #[must_use]
    pub fn with_standard_quoting(mut self, standard_quoting: bool) -> Self {
        self.dialect.standard_quoting = standard_quoting;
        self
    }

    /// Returns the options with identifier-chain folding switched on or off.
    #[must_use]
    pub fn with_fully_qualified(mut self, fully_qualified: bool) -> Self {
        self.dialect.fully_qualified = fully_qualified;
        self
    }

    /// Returns the options with whitespace suppression switched on or off.
    #[must_use]
    pub fn with_ignore_whitespace(mut self, ignore_whitespace: bool) -> Self {
        self.ignore_whitespace = ignore_whitespace;
        self
    }

    /// Returns the options with location tracking switched on or off.
    #[must_use]
    pub fn with_show_location(mut self, show_location: bool) -> Self {
        self.show_location = show_location;
        self
    }
}

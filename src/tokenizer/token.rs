//! Tokens produced by the scanner.

/// A token produced by the scanner.
///
/// The text is a slice of the scanned source, so tokens never own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'input> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The exact source text of the token.
    pub text: &'input str,
    /// Byte offset where the token starts.
    pub start: usize,
    /// Byte offset just past the token.
    pub end: usize,
    /// 1-based character position of the token's last character, counted
    /// from the start of the input including skipped whitespace.
    ///
    /// Only filled when the tokenizer runs with `show_location`.
    pub location: Option<usize>,
}

impl Token<'_> {
    /// Whether this is the given symbol.
    #[must_use]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.text == symbol
    }

    /// Whether this is a bare word equal to `keyword`, ignoring ASCII case.
    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Identifier && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Whether this is whitespace or a comment.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }
}

/// The different kinds of tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "testing", derive(arbitrary::Arbitrary))]
pub enum TokenKind {
    /// Bare word: `[a-z_][a-z0-9_$]*`, any case. Keywords are bare words too.
    Identifier,
    /// Double-quoted identifier, `"..."` with `""` escapes.
    QuotedIdentifier,
    /// Dotted chain of identifiers folded into one token (fully-qualified mode).
    QualifiedIdentifier,
    /// Numeric literal.
    Number,
    /// Positional parameter such as `$1`.
    NumberedParam,
    /// Old-style named parameter such as `%(name)s`.
    OldStyleParam,
    /// New-style brace parameter such as `{name}` or `{name:type}`.
    NewStyleParam,
    /// Single-quoted string literal, optionally `E`-prefixed.
    StringLiteral,
    /// Dollar-quoted string literal, `$tag$...$tag$`.
    DollarQuotedLiteral,
    /// Run of whitespace and comments.
    Whitespace,
    /// Operator run or single punctuation character.
    Symbol,
    /// A single character no other rule accepts.
    Error,
}

impl TokenKind {
    /// Returns a `'static` descriptive name for this token kind.
    #[must_use]
    pub fn static_name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "<identifier>",
            TokenKind::QuotedIdentifier => "<quoted identifier>",
            TokenKind::QualifiedIdentifier => "<qualified identifier>",
            TokenKind::Number => "<number>",
            TokenKind::NumberedParam => "<numbered parameter>",
            TokenKind::OldStyleParam => "<named parameter>",
            TokenKind::NewStyleParam => "<brace parameter>",
            TokenKind::StringLiteral => "<string>",
            TokenKind::DollarQuotedLiteral => "<dollar-quoted string>",
            TokenKind::Whitespace => "<whitespace>",
            TokenKind::Symbol => "<symbol>",
            TokenKind::Error => "<error>",
        }
    }

    /// Whether the token names something: bare, quoted or qualified identifier.
    #[must_use]
    pub fn is_identifier(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier | TokenKind::QuotedIdentifier | TokenKind::QualifiedIdentifier
        )
    }

    /// Whether the token is a literal value.
    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Number | TokenKind::StringLiteral | TokenKind::DollarQuotedLiteral
        )
    }
}

impl AsRef<str> for TokenKind {
    fn as_ref(&self) -> &str {
        self.static_name()
    }
}

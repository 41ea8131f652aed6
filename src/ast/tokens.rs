/// Lexical category of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Special
    /// Text that matches no other category
    Illegal,

    /// End of input
    Eof,

    /// One run of contiguous whitespace
    Whitespace,

    // Literals
    /// Bare word used as a property name
    ///
    /// # Examples
    /// ```text
    /// user_id
    /// amount
    /// SUM
    /// ```
    Ident,

    /// Numeric literal (digits, at most one decimal point)
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.5
    /// -1
    /// ```
    Number,

    /// Double-quoted string literal
    ///
    /// # Examples
    /// ```text
    /// "purchase"
    /// "item #1"
    /// ```
    String,

    // Operators
    /// Equal (`=`)
    Eq,
    /// Not equal (`!=`)
    NotEq,
    /// Greater than (`>`)
    Gt,
    /// Greater than or equal (`>=`)
    GtEq,
    /// Less than (`<`)
    Lt,
    /// Less than or equal (`<=`)
    LtEq,
    /// Multiply (`*`)
    Star,

    // Punctuation
    /// Field separator
    Comma,
    /// Opens an aggregation argument, as in `SUM(amount)`
    LParen,
    /// Closes an aggregation argument
    RParen,

    // Keywords (case-insensitive)
    Map,
    Reduce,
    On,
    Where,
    And,
    In,
}

/// A scanned token: its category plus the exact source text it covers.
///
/// Concatenating `text` over every token of an input reproduces the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Token::new(TokenKind::Eof, "")
    }

    /// The literal value of the token. String literals lose their quotes.
    pub fn literal(&self) -> &str {
        match self.kind {
            TokenKind::String => self
                .text
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .unwrap_or(&self.text),
            _ => &self.text,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

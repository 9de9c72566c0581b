//! Token kinds and spans.

use quint_util::Span;

/// The kind of a lexed token.
///
/// Structural punctuators get one variant each so the decoder can match on
/// kind alone without re-reading the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Unquoted member name.
    Identifier,
    /// String literal; the span covers the characters between the quotes.
    Str,
    /// Numeric literal, including hex, `Infinity` and `NaN` forms.
    Number,
    /// `true` or `false`.
    Bool,
    /// `null`.
    Null,
    /// `{`
    BraceOpen,
    /// `}`
    BraceClose,
    /// `[`
    BracketOpen,
    /// `]`
    BracketClose,
    /// `:`
    Colon,
    /// `,`
    Comma,
}

impl TokenKind {
    /// A short human-readable label, used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Str => "string",
            TokenKind::Number => "number",
            TokenKind::Bool => "boolean",
            TokenKind::Null => "null",
            TokenKind::BraceOpen => "'{'",
            TokenKind::BraceClose => "'}'",
            TokenKind::BracketOpen => "'['",
            TokenKind::BracketClose => "']'",
            TokenKind::Colon => "':'",
            TokenKind::Comma => "','",
        }
    }

    /// Returns true if a token of this kind can begin a value.
    pub fn starts_value(self) -> bool {
        matches!(
            self,
            TokenKind::Str
                | TokenKind::Number
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::BraceOpen
                | TokenKind::BracketOpen
        )
    }

    /// Returns true if a token of this kind can end a value: a scalar, or
    /// the closer of a container.
    pub fn closes_value(self) -> bool {
        matches!(
            self,
            TokenKind::Str
                | TokenKind::Number
                | TokenKind::Bool
                | TokenKind::Null
                | TokenKind::BraceClose
                | TokenKind::BracketClose
        )
    }
}

/// A token: a kind plus the half-open byte span it covers in the source.
///
/// Tokens never outlive the decode call that produced them; the literal
/// text is read back through the span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the literal text this token covers in `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.text(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_value() {
        assert!(TokenKind::Str.starts_value());
        assert!(TokenKind::Number.starts_value());
        assert!(TokenKind::BraceOpen.starts_value());
        assert!(TokenKind::BracketOpen.starts_value());
        assert!(!TokenKind::Identifier.starts_value());
        assert!(!TokenKind::Comma.starts_value());
        assert!(!TokenKind::Colon.starts_value());
    }

    #[test]
    fn test_closes_value() {
        assert!(TokenKind::Null.closes_value());
        assert!(TokenKind::BraceClose.closes_value());
        assert!(TokenKind::BracketClose.closes_value());
        assert!(!TokenKind::BraceOpen.closes_value());
        assert!(!TokenKind::Identifier.closes_value());
    }

    #[test]
    fn test_token_text() {
        let source = "{key: 1}";
        let token = Token::new(TokenKind::Identifier, Span::new(1, 4));
        assert_eq!(token.text(source), "key");
    }
}

//! String literal FSM and escape validation.
//!
//! Entered on `'` or `"`; the opening quote becomes the closing delimiter.
//! The emitted token's span covers the characters *between* the delimiters.
//! Escape sequences are validated and stepped over here but not translated;
//! the decoder performs the actual unescaping from the token span.

use quint_util::{DecodeError, DecodeErrorKind, Span};

use crate::consts;
use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a string literal starting at the opening quote.
    pub(crate) fn lex_string(&mut self) -> Result<Token, DecodeError> {
        let quote = self.cursor.current_char();
        if quote != '"' && quote != '\'' {
            return Err(self.error_here(DecodeErrorKind::StringInvalidStart(quote)));
        }
        self.cursor.advance();
        let content_start = self.cursor.position();

        loop {
            if self.cursor.is_at_end() {
                return Err(self.error_here(DecodeErrorKind::UnexpectedEndOfString));
            }

            let c = self.cursor.current_char();

            // A raw line feed is only legal behind a line continuation,
            // which validate_escape consumes together with the backslash.
            if c == '\n' {
                return Err(self.error_here(DecodeErrorKind::UnexpectedEndOfString));
            }

            if c == quote {
                let span = Span::new(content_start, self.cursor.position());
                self.cursor.advance();
                return Ok(Token::new(TokenKind::Str, span));
            }

            if c == '\\' {
                self.validate_escape()?;
            } else {
                self.cursor.advance();
            }
        }
    }

    /// Validates one escape sequence and advances past it.
    ///
    /// Accepted forms: a line continuation (`\` + optional whitespace + LF),
    /// a single-character escape, `\xHH`, and `\uHHHH`.
    fn validate_escape(&mut self) -> Result<(), DecodeError> {
        let escape_start = self.cursor.position();
        self.cursor.advance();

        if self.cursor.is_at_end() {
            return Err(self.error_at(DecodeErrorKind::UnexpectedEof, escape_start));
        }

        let c = self.cursor.current_char();

        if c == '\n' {
            self.cursor.advance();
            return Ok(());
        }

        if consts::is_whitespace(c) {
            // Whitespace-padded line continuation: the run must end in a
            // line feed.
            while !self.cursor.is_at_end()
                && consts::is_whitespace(self.cursor.current_char())
                && self.cursor.current_char() != '\n'
            {
                self.cursor.advance();
            }
            if self.cursor.is_at_end() {
                return Err(self.error_here(DecodeErrorKind::UnexpectedEof));
            }
            if self.cursor.current_char() == '\n' {
                self.cursor.advance();
                return Ok(());
            }
            return Err(self.error_here(DecodeErrorKind::UnexpectedEndOfString));
        }

        if consts::escape_char(c).is_some() {
            self.cursor.advance();
            return Ok(());
        }

        match c {
            'u' => {
                self.cursor.advance();
                self.expect_escape_hex(4, escape_start, "\\u")
            },
            'x' => {
                self.cursor.advance();
                self.expect_escape_hex(2, escape_start, "\\x")
            },
            _ => Err(self.error_at(
                DecodeErrorKind::UnexpectedEscapeSequence(format!("\\{c}")),
                escape_start,
            )),
        }
    }

    /// Consumes exactly `count` hex digits of a `\x`/`\u` escape.
    fn expect_escape_hex(
        &mut self,
        count: usize,
        escape_start: usize,
        prefix: &str,
    ) -> Result<(), DecodeError> {
        let digit_start = self.cursor.position();
        for _ in 0..count {
            if self.cursor.is_at_end() {
                return Err(self.error_at(DecodeErrorKind::UnexpectedEof, escape_start));
            }
            if !self.cursor.current_char().is_ascii_hexdigit() {
                let seen: String = self.cursor.source()[digit_start..]
                    .chars()
                    .take(count)
                    .collect();
                return Err(self.error_at(
                    DecodeErrorKind::UnexpectedEscapeSequence(format!("{prefix}{seen}")),
                    escape_start,
                ));
            }
            self.cursor.advance();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn lex_content(source: &str) -> String {
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Str);
        tokens[0].text(source).to_string()
    }

    fn lex_err(source: &str) -> DecodeErrorKind {
        tokenize(source).unwrap_err().kind
    }

    #[test]
    fn test_double_quoted() {
        assert_eq!(lex_content("\"hello\""), "hello");
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(lex_content("'hello'"), "hello");
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(lex_content("\"\""), "");
        assert_eq!(lex_content("''"), "");
    }

    #[test]
    fn test_span_excludes_delimiters() {
        let source = "'abc'";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[0].span, Span::new(1, 4));
    }

    #[test]
    fn test_single_quoted_with_embedded_double_quotes() {
        assert_eq!(
            lex_content("'I can use \"double quotes\" here'"),
            "I can use \"double quotes\" here"
        );
    }

    #[test]
    fn test_escaped_quote_does_not_terminate() {
        assert_eq!(lex_content(r#""a\"b""#), r#"a\"b"#);
        assert_eq!(lex_content(r"'a\'b'"), r"a\'b");
    }

    #[test]
    fn test_hex_and_unicode_escapes_validated() {
        assert_eq!(lex_content(r#""\x41A""#), r"\x41A");
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(lex_content("'a\\\nb'"), "a\\\nb");
    }

    #[test]
    fn test_line_continuation_with_padding() {
        assert_eq!(lex_content("'a\\  \nb'"), "a\\  \nb");
    }

    #[test]
    fn test_raw_newline_rejected() {
        assert_eq!(lex_err("'a\nb'"), DecodeErrorKind::UnexpectedEndOfString);
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(lex_err("'abc"), DecodeErrorKind::UnexpectedEndOfString);
    }

    #[test]
    fn test_unknown_escape() {
        assert_eq!(
            lex_err(r#""\q""#),
            DecodeErrorKind::UnexpectedEscapeSequence("\\q".to_string())
        );
    }

    #[test]
    fn test_bad_unicode_escape() {
        assert_eq!(
            lex_err(r#""\u00GG""#),
            DecodeErrorKind::UnexpectedEscapeSequence("\\u00GG".to_string())
        );
    }

    #[test]
    fn test_bad_hex_escape() {
        assert_eq!(
            lex_err(r#""\xZ1""#),
            DecodeErrorKind::UnexpectedEscapeSequence("\\xZ1".to_string())
        );
    }

    #[test]
    fn test_continuation_without_newline_rejected() {
        // Backslash + spaces that never reach a line feed.
        assert_eq!(lex_err("'a\\  b'"), DecodeErrorKind::UnexpectedEndOfString);
    }

    #[test]
    fn test_eof_inside_escape() {
        assert_eq!(lex_err("'a\\"), DecodeErrorKind::UnexpectedEof);
        assert_eq!(lex_err("'a\\u00"), DecodeErrorKind::UnexpectedEof);
    }
}

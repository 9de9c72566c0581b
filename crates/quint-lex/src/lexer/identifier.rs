//! Identifier FSM and keyword re-tagging.
//!
//! A JSON5 identifier starts with `$`, `_`, a Unicode letter, or a
//! `\uHHHH` escape; continuation characters additionally admit combining
//! marks, digits, connector punctuation, and ZWJ/ZWNJ. After scanning, the
//! literal text is re-tagged: `true`/`false` become boolean tokens, `null`
//! becomes a null token, `Infinity`/`NaN` become number tokens, and ES5.1
//! reserved words are rejected.

use quint_util::{DecodeError, DecodeErrorKind, Span};

use crate::consts;
use crate::token::{Token, TokenKind};
use crate::unicode;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes an identifier, re-tagging keyword literals.
    pub(crate) fn lex_identifier_or_keyword(&mut self) -> Result<Token, DecodeError> {
        let start = self.cursor.position();
        self.validate_identifier_start()?;

        loop {
            if self.cursor.is_at_end() {
                break;
            }
            let c = self.cursor.current_char();
            if consts::is_whitespace(c) || consts::is_punctuator(c) {
                break;
            }

            if c == '\\' {
                if self.at_unicode_escape() {
                    self.cursor.advance_n(6);
                } else {
                    return Err(self.error_here(DecodeErrorKind::InvalidIdentifierChar('\\')));
                }
            } else if unicode::is_identifier_continue(c) {
                self.cursor.advance();
            } else {
                return Err(self.error_here(DecodeErrorKind::InvalidIdentifierChar(c)));
            }
        }

        let span = Span::new(start, self.cursor.position());
        let text = span.text(self.cursor.source());
        let kind = match text {
            "true" | "false" => TokenKind::Bool,
            "null" => TokenKind::Null,
            "Infinity" | "NaN" => TokenKind::Number,
            _ if consts::is_reserved_word(text) => {
                return Err(
                    self.error_at(DecodeErrorKind::ReservedWord(text.to_string()), start)
                );
            },
            _ => TokenKind::Identifier,
        };
        Ok(Token::new(kind, span))
    }

    /// Validates and consumes the identifier's first code point.
    fn validate_identifier_start(&mut self) -> Result<(), DecodeError> {
        let c = self.cursor.current_char();

        if unicode::is_identifier_start(c) {
            self.cursor.advance();
            return Ok(());
        }

        if c == '\\' {
            let start = self.cursor.position();
            if self.cursor.remaining().len() < 6 {
                return Err(self.error_at(DecodeErrorKind::UnexpectedEof, start));
            }
            if self.at_unicode_escape() {
                self.cursor.advance_n(6);
                return Ok(());
            }
            let seen: String = self.cursor.remaining().chars().skip(1).take(5).collect();
            return Err(self.error_at(
                DecodeErrorKind::InvalidIdentifierStart(format!("\\{seen}")),
                start,
            ));
        }

        Err(self.error_here(DecodeErrorKind::InvalidIdentifierStart(c.to_string())))
    }

    /// Returns true if the cursor sits on a well-formed `\uHHHH` escape.
    fn at_unicode_escape(&self) -> bool {
        let mut chars = self.cursor.remaining().chars();
        if chars.next() != Some('\\') || chars.next() != Some('u') {
            return false;
        }
        (0..4).all(|_| chars.next().is_some_and(|c| c.is_ascii_hexdigit()))
    }
}

//! Core lexer implementation.
//!
//! This module contains the main `Lexer` struct, the top-level dispatch
//! loop, and the shared error helpers the sub-lexers report through.

use quint_util::{DecodeError, DecodeErrorKind, Span};

use crate::consts;
use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Tokenizes a JSON5 document.
///
/// Returns the ordered token sequence covering the non-whitespace,
/// non-comment substance of the input. Spans are half-open byte intervals,
/// non-overlapping and strictly increasing in start offset.
pub fn tokenize(source: &str) -> Result<Vec<Token>, DecodeError> {
    Lexer::new(source).tokenize()
}

/// Lexer for JSON5 documents.
///
/// Drives a cursor over the source buffer and dispatches by lookahead to
/// the number, string, and identifier sub-lexers. Comments and whitespace
/// are consumed without emitting tokens.
pub struct Lexer<'a> {
    /// Character cursor for source traversal.
    pub(crate) cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Runs the lexer over the whole input and collects the token sequence.
    pub fn tokenize(mut self) -> Result<Vec<Token>, DecodeError> {
        let mut tokens = Vec::new();

        while !self.cursor.is_at_end() {
            let c = self.cursor.current_char();

            if consts::is_whitespace(c) {
                self.cursor.advance();
                continue;
            }

            match c {
                '/' => self.skip_comment()?,
                '{' => tokens.push(self.punctuator(TokenKind::BraceOpen)),
                '}' => tokens.push(self.punctuator(TokenKind::BraceClose)),
                '[' => tokens.push(self.punctuator(TokenKind::BracketOpen)),
                ']' => tokens.push(self.punctuator(TokenKind::BracketClose)),
                ':' => tokens.push(self.punctuator(TokenKind::Colon)),
                ',' => tokens.push(self.punctuator(TokenKind::Comma)),
                '\'' | '"' => tokens.push(self.lex_string()?),
                c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                    tokens.push(self.lex_number()?)
                },
                _ => tokens.push(self.lex_identifier_or_keyword()?),
            }
        }

        Ok(tokens)
    }

    /// Emits a one-character punctuator token.
    fn punctuator(&mut self, kind: TokenKind) -> Token {
        let start = self.cursor.position();
        self.cursor.advance();
        Token::new(kind, Span::new(start, start + 1))
    }

    /// Builds a decode error anchored at `pos`.
    pub(crate) fn error_at(&self, kind: DecodeErrorKind, pos: usize) -> DecodeError {
        DecodeError::new(kind, self.cursor.source(), pos)
    }

    /// Builds a decode error anchored at the current cursor position.
    pub(crate) fn error_here(&self, kind: DecodeErrorKind) -> DecodeError {
        self.error_at(kind, self.cursor.position())
    }
}

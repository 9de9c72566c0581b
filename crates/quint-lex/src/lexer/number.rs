//! Number literal FSM.
//!
//! Recognizes the JSON5 numeric grammar: signed decimal integers and
//! floats, leading/trailing-dot forms, exponents, hexadecimal integers,
//! and signed `Infinity`/`NaN`. The machine validates shape only; the
//! decoder parses the literal text out of the token span.

use quint_util::{DecodeError, DecodeErrorKind, Span};

use crate::consts;
use crate::token::{Token, TokenKind};
use crate::Lexer;

/// States of the number FSM. A token that terminates in an accepting state
/// is emitted as a number; every other state maps to a specific diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumberState {
    /// Initial state, waiting for a sign, digit, dot, or constant.
    Start,
    /// Read a `+` or `-`, waiting for the rest of the number.
    Sign,
    /// Read `Infinity` (accepting).
    Infinity,
    /// Read `NaN` (accepting).
    Nan,
    /// Read the integer zero (accepting).
    IntZero,
    /// Read a non-zero integer part (accepting).
    IntNonzero,
    /// Read a dot with no integer part, waiting for fraction digits.
    DotNoint,
    /// Read a dot after an integer part (accepting; admits `123.`).
    DotInt,
    /// Reading fraction digits (accepting).
    Fraction,
    /// Read the exponent indicator, waiting for a sign or digit.
    ExpStart,
    /// Read the exponent sign, waiting for digits.
    ExpSign,
    /// Reading exponent digits (accepting).
    ExpDigits,
    /// Read the `0x` prefix, waiting for hex digits.
    HexStart,
    /// Reading hex digits (accepting).
    HexDigits,
}

impl NumberState {
    fn is_accepting(self) -> bool {
        matches!(
            self,
            NumberState::Infinity
                | NumberState::Nan
                | NumberState::IntZero
                | NumberState::IntNonzero
                | NumberState::DotInt
                | NumberState::Fraction
                | NumberState::ExpDigits
                | NumberState::HexDigits
        )
    }
}

/// Returns true for the characters that terminate a number token:
/// whitespace, a comma, or a closing brace/bracket.
fn is_terminator(c: char) -> bool {
    consts::is_whitespace(c) || matches!(c, ',' | ']' | '}')
}

impl<'a> Lexer<'a> {
    /// Lexes a number literal starting at the current cursor position.
    pub(crate) fn lex_number(&mut self) -> Result<Token, DecodeError> {
        let start = self.cursor.position();
        let mut state = NumberState::Start;

        loop {
            if self.cursor.is_at_end() {
                break;
            }
            let c = self.cursor.current_char();
            if is_terminator(c) {
                break;
            }

            state = match state {
                NumberState::Start | NumberState::Sign => match c {
                    '+' | '-' if state == NumberState::Start => {
                        self.cursor.advance();
                        NumberState::Sign
                    },
                    'I' => {
                        self.expect_number_constant("Infinity")?;
                        NumberState::Infinity
                    },
                    'N' => {
                        self.expect_number_constant("NaN")?;
                        NumberState::Nan
                    },
                    '0' => {
                        self.cursor.advance();
                        NumberState::IntZero
                    },
                    '1'..='9' => {
                        self.cursor.advance();
                        NumberState::IntNonzero
                    },
                    '.' => {
                        self.cursor.advance();
                        NumberState::DotNoint
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                NumberState::IntZero => match c {
                    'x' | 'X' => {
                        self.cursor.advance();
                        NumberState::HexStart
                    },
                    '.' => {
                        self.cursor.advance();
                        NumberState::DotInt
                    },
                    'e' | 'E' => {
                        self.cursor.advance();
                        NumberState::ExpStart
                    },
                    '0'..='9' => {
                        return Err(self.error_here(DecodeErrorKind::LeadingZeroFollowedByDigit))
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                NumberState::IntNonzero => match c {
                    '0'..='9' => {
                        self.cursor.advance();
                        NumberState::IntNonzero
                    },
                    '.' => {
                        self.cursor.advance();
                        NumberState::DotInt
                    },
                    'e' | 'E' => {
                        self.cursor.advance();
                        NumberState::ExpStart
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                // The digit is not consumed here; the `Fraction` state
                // re-examines it on the next iteration.
                NumberState::DotNoint => match c {
                    '0'..='9' => NumberState::Fraction,
                    _ => return Err(self.error_here(DecodeErrorKind::TrailingDot)),
                },
                NumberState::DotInt => match c {
                    '0'..='9' => NumberState::Fraction,
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                NumberState::Fraction => match c {
                    '0'..='9' => {
                        self.cursor.advance();
                        NumberState::Fraction
                    },
                    'e' | 'E' => {
                        self.cursor.advance();
                        NumberState::ExpStart
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                NumberState::ExpStart => match c {
                    '+' | '-' => {
                        self.cursor.advance();
                        NumberState::ExpSign
                    },
                    '0'..='9' => {
                        self.cursor.advance();
                        NumberState::ExpDigits
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::TrailingExponent)),
                },
                NumberState::ExpSign => match c {
                    '0'..='9' => {
                        self.cursor.advance();
                        NumberState::ExpDigits
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::TrailingExponentSign)),
                },
                NumberState::ExpDigits => match c {
                    '0'..='9' => {
                        self.cursor.advance();
                        NumberState::ExpDigits
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                NumberState::HexStart => match c {
                    c if c.is_ascii_hexdigit() => {
                        self.cursor.advance();
                        NumberState::HexDigits
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::NoHexDigits)),
                },
                NumberState::HexDigits => match c {
                    c if c.is_ascii_hexdigit() => {
                        self.cursor.advance();
                        NumberState::HexDigits
                    },
                    _ => return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c))),
                },
                NumberState::Infinity | NumberState::Nan => {
                    return Err(self.error_here(DecodeErrorKind::UnexpectedCharInNumber(c)))
                },
            };
        }

        if state.is_accepting() {
            return Ok(Token::new(
                TokenKind::Number,
                Span::new(start, self.cursor.position()),
            ));
        }

        let kind = match state {
            NumberState::Start | NumberState::Sign => DecodeErrorKind::NoNumber,
            NumberState::DotNoint => DecodeErrorKind::TrailingDot,
            NumberState::ExpStart => DecodeErrorKind::TrailingExponent,
            NumberState::ExpSign => DecodeErrorKind::TrailingExponentSign,
            NumberState::HexStart => DecodeErrorKind::NoHexDigits,
            _ => unreachable!("accepting state handled above"),
        };
        Err(self.error_here(kind))
    }

    /// Consumes a named number constant (`Infinity` or `NaN`), requiring an
    /// exact character-for-character match.
    fn expect_number_constant(&mut self, word: &'static str) -> Result<(), DecodeError> {
        if self.cursor.starts_with(word) {
            self.cursor.advance_n(word.len());
            return Ok(());
        }
        let actual: String = self
            .cursor
            .remaining()
            .chars()
            .take_while(|&c| !is_terminator(c))
            .collect();
        Err(self.error_here(DecodeErrorKind::InvalidNumberConstant {
            expected: word,
            actual,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn lex_one(source: &str) -> Token {
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens.len(), 1, "expected one token for {source:?}");
        tokens[0]
    }

    fn lex_err(source: &str) -> DecodeErrorKind {
        tokenize(source).unwrap_err().kind
    }

    #[test]
    fn test_integers() {
        for source in ["0", "42", "123456", "-0", "+7", "-123"] {
            let token = lex_one(source);
            assert_eq!(token.kind, TokenKind::Number);
            assert_eq!(token.text(source), source);
        }
    }

    #[test]
    fn test_floats() {
        for source in ["3.14", "0.5", ".0", ".8675309", "123.", "0.", "-2.5"] {
            let token = lex_one(source);
            assert_eq!(token.kind, TokenKind::Number, "{source}");
            assert_eq!(token.text(source), source);
        }
    }

    #[test]
    fn test_exponents() {
        for source in ["1e10", "1e+0", "2.5e-3", "0e0", "1E6", "23e-2"] {
            assert_eq!(lex_one(source).kind, TokenKind::Number, "{source}");
        }
    }

    #[test]
    fn test_hex() {
        for source in ["0x0", "0xFF", "0Xdecaf", "-0x20", "+0xA"] {
            assert_eq!(lex_one(source).kind, TokenKind::Number, "{source}");
        }
    }

    #[test]
    fn test_signed_constants() {
        for source in ["+Infinity", "-Infinity", "+NaN", "-NaN"] {
            let token = lex_one(source);
            assert_eq!(token.kind, TokenKind::Number);
            assert_eq!(token.text(source), source);
        }
    }

    #[test]
    fn test_constant_followed_by_comma_terminates() {
        let tokens = tokenize("[-Infinity, 1]").unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::BracketOpen,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::BracketClose,
            ]
        );
    }

    #[test]
    fn test_leading_zero_followed_by_digit() {
        assert_eq!(lex_err("012"), DecodeErrorKind::LeadingZeroFollowedByDigit);
    }

    #[test]
    fn test_lone_dot_is_trailing_dot() {
        assert_eq!(lex_err("."), DecodeErrorKind::TrailingDot);
        assert_eq!(lex_err(".,"), DecodeErrorKind::TrailingDot);
        assert_eq!(lex_err(".x"), DecodeErrorKind::TrailingDot);
    }

    #[test]
    fn test_lone_sign_is_no_number() {
        assert_eq!(lex_err("+"), DecodeErrorKind::NoNumber);
        assert_eq!(lex_err("-"), DecodeErrorKind::NoNumber);
    }

    #[test]
    fn test_double_sign_rejected() {
        assert_eq!(lex_err("--1"), DecodeErrorKind::UnexpectedCharInNumber('-'));
    }

    #[test]
    fn test_trailing_exponent() {
        assert_eq!(lex_err("1e"), DecodeErrorKind::TrailingExponent);
        assert_eq!(lex_err("1e+"), DecodeErrorKind::TrailingExponentSign);
    }

    #[test]
    fn test_hex_without_digits() {
        assert_eq!(lex_err("0x"), DecodeErrorKind::NoHexDigits);
        assert_eq!(lex_err("0xg"), DecodeErrorKind::NoHexDigits);
    }

    #[test]
    fn test_bad_constant_after_sign() {
        assert!(matches!(
            lex_err("-Infinite"),
            DecodeErrorKind::InvalidNumberConstant {
                expected: "Infinity",
                ..
            }
        ));
        assert!(matches!(
            lex_err("+Nah"),
            DecodeErrorKind::InvalidNumberConstant {
                expected: "NaN",
                ..
            }
        ));
    }

    #[test]
    fn test_dot_after_int_then_exponent_rejected() {
        // `123.e5` is not admitted; the dot-with-int state only accepts digits.
        assert_eq!(
            lex_err("123.e5"),
            DecodeErrorKind::UnexpectedCharInNumber('e')
        );
    }
}

//! Error types for decoding and encoding JSON5.
//!
//! Decode failures carry the byte offset of the first offending character
//! plus line/column numbers derived from the source buffer at construction
//! time. Encode failures carry no location; they describe the value that
//! could not be serialized.

use thiserror::Error;

/// The reason a decode failed.
///
/// The `Display` form of each variant is the unformatted message; the full
/// location-bearing message is produced by [`DecodeError`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeErrorKind {
    // Lexical errors
    #[error("Unexpected end of file")]
    UnexpectedEof,

    #[error("Unexpected character '{0}' in number")]
    UnexpectedCharInNumber(char),

    #[error("Leading '0' cannot be followed by more digits")]
    LeadingZeroFollowedByDigit,

    #[error("No number found")]
    NoNumber,

    #[error("Trailing dot in number")]
    TrailingDot,

    #[error("Trailing exponent in number")]
    TrailingExponent,

    #[error("Trailing sign in exponent")]
    TrailingExponentSign,

    #[error("No hexadecimal digits found")]
    NoHexDigits,

    #[error("Invalid constant, expected {expected}, got {actual}")]
    InvalidNumberConstant {
        expected: &'static str,
        actual: String,
    },

    #[error("Invalid start of string: <{0}>")]
    StringInvalidStart(char),

    #[error("Unexpected end of string")]
    UnexpectedEndOfString,

    #[error("Unexpected escape sequence: <{0}>")]
    UnexpectedEscapeSequence(String),

    #[error("Invalid start of identifier: <{0}>")]
    InvalidIdentifierStart(String),

    #[error("Invalid character in identifier: <{0}>")]
    InvalidIdentifierChar(char),

    #[error("Reserved word cannot be used as identifier: <{0}>")]
    ReservedWord(String),

    // Structural errors
    #[error("Empty JSON5 document")]
    EmptyDocument,

    #[error("Expecting value")]
    ExpectingValue,

    #[error("Expecting property name followed by ':'")]
    ExpectingPropertyName,

    #[error("Expecting punctuation: <{0}>")]
    ExpectingPunctuation(char),

    #[error("Unexpected punctuation: <{0}>")]
    UnexpectedPunctuation(char),

    #[error("Unexpected token: {0} after ':'")]
    UnexpectedTokenAfterColon(&'static str),

    #[error("Multiple root elements")]
    MultipleRoot,

    #[error("Bad string continuation. `\\` must be followed by a newline")]
    BadStringContinuation,

    #[error("Invalid control character in string")]
    InvalidControlChar,
}

/// Error raised when a JSON5 document cannot be decoded.
///
/// Carries the failure [`kind`](DecodeErrorKind), the byte offset of the
/// first offending character, and the one-based line/column derived from
/// the source buffer.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: line {line} column {column} (char {pos})")]
pub struct DecodeError {
    /// What went wrong.
    pub kind: DecodeErrorKind,
    /// Byte offset of the failure in the source buffer.
    pub pos: usize,
    /// One-based line number of `pos`.
    pub line: usize,
    /// One-based column number of `pos`.
    pub column: usize,
}

impl DecodeError {
    /// Creates a decode error at byte offset `pos` of `doc`, deriving the
    /// line and column numbers from the newlines preceding `pos`.
    pub fn new(kind: DecodeErrorKind, doc: &str, pos: usize) -> Self {
        let pos = pos.min(doc.len());
        let before = &doc.as_bytes()[..pos];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let column = match before.iter().rposition(|&b| b == b'\n') {
            Some(newline) => pos - newline,
            None => pos + 1,
        };
        Self {
            kind,
            pos,
            line,
            column,
        }
    }
}

/// Error raised when a value cannot be encoded as JSON5.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("Circular reference detected")]
    CircularReference,

    #[error("Out of range float values are not allowed: {0}")]
    FloatOutOfRange(f64),

    #[error("keys must be str, int, float, bool or null, not {0}")]
    InvalidKeyType(&'static str),

    #[error("Object of type {0} is not JSON5 serializable")]
    UnableToEncode(&'static str),

    #[error("Invalid schema descriptor: {0}")]
    InvalidSchema(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_and_column_on_first_line() {
        let err = DecodeError::new(DecodeErrorKind::ExpectingValue, "abc def", 4);
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 5);
        assert_eq!(err.pos, 4);
    }

    #[test]
    fn test_line_and_column_after_newlines() {
        //                                                      0123 4567 89
        let err = DecodeError::new(DecodeErrorKind::ExpectingValue, "abc\ndef\ngh", 9);
        assert_eq!(err.line, 3);
        assert_eq!(err.column, 2);
    }

    #[test]
    fn test_display_format() {
        let err = DecodeError::new(DecodeErrorKind::MultipleRoot, "a b", 2);
        assert_eq!(
            err.to_string(),
            "Multiple root elements: line 1 column 3 (char 2)"
        );
    }

    #[test]
    fn test_position_clamped_to_buffer() {
        let err = DecodeError::new(DecodeErrorKind::UnexpectedEof, "ab", 10);
        assert_eq!(err.pos, 2);
        assert_eq!(err.column, 3);
    }

    #[test]
    fn test_encode_error_display() {
        assert_eq!(
            EncodeError::CircularReference.to_string(),
            "Circular reference detected"
        );
        assert_eq!(
            EncodeError::InvalidKeyType("array").to_string(),
            "keys must be str, int, float, bool or null, not array"
        );
    }
}

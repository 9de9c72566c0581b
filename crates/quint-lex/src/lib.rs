//! quint-lex - JSON5 tokenizer.
//!
//! The lexer transforms JSON5 source text into an ordered sequence of
//! [`Token`]s. Each token is a `(kind, span)` pair; the span is a half-open
//! byte interval into the source buffer, so the lexer never copies literal
//! text. Whitespace and comments are consumed but not emitted.
//!
//! The three literal sub-lexers (numbers, strings, identifiers) are explicit
//! finite-state machines with many accepting states; they validate shape and
//! report precise byte-offset diagnostics but leave escape translation to
//! the decoder. The implementation is organized like the rest of the
//! pipeline:
//!
//! - `cursor` - byte-position cursor over the source text
//! - `consts` - shared lexical constants (whitespace, punctuators, escapes,
//!   reserved words)
//! - `unicode` - identifier character classes and hex-digit helpers
//! - `token` - token kinds and spans
//! - `lexer` - the dispatch loop and the three sub-lexer FSMs

pub mod consts;
pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;
pub mod unicode;

pub use cursor::Cursor;
pub use lexer::{tokenize, Lexer};
pub use token::{Token, TokenKind};

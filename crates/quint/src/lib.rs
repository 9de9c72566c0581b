//! quint - a JSON5 reader and writer.
//!
//! JSON5 is a superset of JSON that admits unquoted member names,
//! single-quoted strings, comments, trailing commas, hexadecimal and
//! signed/leading-dot numeric literals, `Infinity`/`NaN`, and string line
//! continuations. This crate decodes JSON5 text into a [`Value`] tree and
//! encodes value trees (or any [`Encode`] type) back to JSON5 text.
//!
//! ```
//! use quint::Value;
//!
//! let value = quint::from_str("{ key: 'v', hex: 0xFF, arr: [1, 2,], }").unwrap();
//! assert_eq!(value.get("hex"), Some(&Value::Int(255)));
//!
//! let text = quint::to_string(&value).unwrap();
//! assert_eq!(text, "{\"key\": \"v\", \"hex\": 255, \"arr\": [1, 2]}");
//! ```
//!
//! Decoding is customizable through [`Decoder`] hooks (scalar parsers,
//! object materialization); encoding through [`Encoder`] policies
//! (indentation, separators, escaping, quoting, key ordering, trailing
//! commas) and schema-driven comment injection ([`CommentSchema`]).
//! Comments in the input are discarded on decode and synthesized only on
//! encode from schema metadata.

use std::io;

use thiserror::Error;

pub mod comments;
pub mod decoder;
pub mod encode;
pub mod encoder;
pub mod value;

pub use quint_util::{DecodeError, DecodeErrorKind, EncodeError, Span};

pub use comments::{comment_map_from_schema, CommentMap, CommentSchema, MemberComments};
pub use decoder::Decoder;
pub use encode::{Encode, EncodeKey, KeyShape, Shape};
pub use encoder::{Encoder, KeyQuotation};
pub use value::{Map, Value};

/// Error from [`from_reader`]: either the read itself or the decode
/// failed.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Error from [`to_writer`]: either the encode or the write failed.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Decodes a JSON5 document with the default [`Decoder`] configuration.
pub fn from_str(text: &str) -> Result<Value, DecodeError> {
    Decoder::new().decode(text)
}

/// Reads a full stream to its end and decodes it as one JSON5 document.
pub fn from_reader<R: io::Read>(mut reader: R) -> Result<Value, ReadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(from_str(&text)?)
}

/// Encodes a value to a JSON5 string with the default [`Encoder`]
/// configuration.
pub fn to_string(value: &dyn Encode) -> Result<String, EncodeError> {
    Encoder::new().encode(value)
}

/// Encodes a value into `writer` with the default [`Encoder`]
/// configuration, appending a trailing newline.
pub fn to_writer<W: io::Write>(value: &dyn Encode, writer: W) -> Result<(), WriteError> {
    Encoder::new().to_writer(value, None, writer)
}

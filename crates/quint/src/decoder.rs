//! Token-driven JSON5 decoder.
//!
//! The decoder consumes the lexer's token sequence with a single-pass stack
//! machine. Each stack frame is an object under construction (with an
//! optional pending key) or an array under construction; containers are
//! attached to their parent when their closing punctuator is consumed.
//! Structural grammar violations are reported with the byte offset of the
//! offending token.
//!
//! Caller-provided hooks customize materialization: `parse_int`,
//! `parse_float` and `parse_constant` replace scalar parsing, `object_hook`
//! transforms the root and nested objects, and `object_pairs_hook` is
//! called once, with the root object's ordered `(key, value)` pair list,
//! duplicate keys preserved. Hooks are never called with partial values.

use quint_lex::{consts, tokenize, unicode, Token, TokenKind};
use quint_util::{DecodeError, DecodeErrorKind};

use crate::value::{Map, Value};

/// Hook replacing the native parser for one scalar class.
pub type ScalarHook = Box<dyn Fn(&str) -> Result<Value, DecodeError>>;

/// Hook applied to every completed object.
pub type ObjectHook = Box<dyn Fn(Map) -> Value>;

/// Hook materializing every completed object from its ordered pair list.
pub type PairsHook = Box<dyn Fn(Vec<(String, Value)>) -> Value>;

/// A reusable JSON5 decoder.
///
/// Holds configuration only; a decoder can be used for any number of
/// [`decode`](Decoder::decode) calls and carries no state between them.
pub struct Decoder {
    strict: bool,
    parse_int: Option<ScalarHook>,
    parse_float: Option<ScalarHook>,
    parse_constant: Option<ScalarHook>,
    object_hook: Option<ObjectHook>,
    object_pairs_hook: Option<PairsHook>,
}

impl Decoder {
    /// Creates a decoder with default configuration: strict mode on, no
    /// hooks.
    pub fn new() -> Self {
        Self {
            strict: true,
            parse_int: None,
            parse_float: None,
            parse_constant: None,
            object_hook: None,
            object_pairs_hook: None,
        }
    }

    /// Sets strict mode. In strict mode (the default) the letter escapes
    /// `\n`, `\r`, `\t` and `\0` are rejected inside strings; their
    /// `\uHHHH` equivalents are accepted either way.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Replaces the native integer parser.
    pub fn parse_int(
        mut self,
        hook: impl Fn(&str) -> Result<Value, DecodeError> + 'static,
    ) -> Self {
        self.parse_int = Some(Box::new(hook));
        self
    }

    /// Replaces the native float parser.
    pub fn parse_float(
        mut self,
        hook: impl Fn(&str) -> Result<Value, DecodeError> + 'static,
    ) -> Self {
        self.parse_float = Some(Box::new(hook));
        self
    }

    /// Replaces the native parser for `Infinity`/`NaN` literals. The hook
    /// receives the literal text including any sign.
    pub fn parse_constant(
        mut self,
        hook: impl Fn(&str) -> Result<Value, DecodeError> + 'static,
    ) -> Self {
        self.parse_constant = Some(Box::new(hook));
        self
    }

    /// Applies `hook` to the root and every nested object as each one
    /// completes.
    pub fn object_hook(mut self, hook: impl Fn(Map) -> Value + 'static) -> Self {
        self.object_hook = Some(Box::new(hook));
        self
    }

    /// Calls `hook` once, after the whole tree is built, with the root
    /// object's ordered `(key, value)` pair list (duplicate keys
    /// preserved). A non-object root passes through unchanged, and nested
    /// objects fold into plain maps without seeing the hook. Takes
    /// precedence over [`object_hook`](Decoder::object_hook).
    pub fn object_pairs_hook(
        mut self,
        hook: impl Fn(Vec<(String, Value)>) -> Value + 'static,
    ) -> Self {
        self.object_pairs_hook = Some(Box::new(hook));
        self
    }

    /// Decodes a JSON5 document into a value tree.
    pub fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        self.raw_decode(text).map(|(value, _)| value)
    }

    /// Decodes a JSON5 document and additionally returns the end offset of
    /// the final token. Trailing whitespace and comments after the root are
    /// consumed but not included in the offset.
    pub fn raw_decode(&self, text: &str) -> Result<(Value, usize), DecodeError> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(DecodeError::new(DecodeErrorKind::EmptyDocument, text, 0));
        }
        Parser {
            decoder: self,
            doc: text,
            tokens: &tokens,
            stack: Vec::new(),
            root: None,
        }
        .run()
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Object accumulator: a map, or an ordered pair list when the pairs hook
/// is active.
enum Accumulator {
    Map(Map),
    Pairs(Vec<(String, Value)>),
}

/// One frame of the parse stack.
enum Container {
    Object {
        acc: Accumulator,
        last_key: Option<String>,
    },
    Array(Vec<Value>),
}

struct Parser<'d, 't> {
    decoder: &'d Decoder,
    doc: &'t str,
    tokens: &'t [Token],
    stack: Vec<Container>,
    root: Option<Value>,
}

impl Parser<'_, '_> {
    fn run(mut self) -> Result<(Value, usize), DecodeError> {
        for idx in 0..self.tokens.len() {
            let token = self.tokens[idx];
            let start = token.span.start;

            match token.kind {
                TokenKind::BraceOpen => {
                    self.check_container_position(idx)?;
                    let acc = if self.decoder.object_pairs_hook.is_some() {
                        Accumulator::Pairs(Vec::new())
                    } else {
                        Accumulator::Map(Map::new())
                    };
                    self.stack.push(Container::Object {
                        acc,
                        last_key: None,
                    });
                },

                TokenKind::BracketOpen => {
                    self.check_container_position(idx)?;
                    self.stack.push(Container::Array(Vec::new()));
                },

                TokenKind::BraceClose => {
                    match self.stack.last() {
                        Some(Container::Object { .. }) => {},
                        _ => {
                            return Err(
                                self.error(DecodeErrorKind::UnexpectedPunctuation('}'), start)
                            )
                        },
                    }
                    let Some(Container::Object { acc, last_key }) = self.stack.pop() else {
                        unreachable!("top of stack checked above");
                    };
                    if last_key.is_some() {
                        return Err(self.error(DecodeErrorKind::ExpectingPunctuation(':'), start));
                    }
                    let is_root = self.stack.is_empty();
                    let value = self.finish_object(acc, is_root);
                    self.place(value, idx)?;
                },

                TokenKind::BracketClose => {
                    match self.stack.last() {
                        Some(Container::Array(_)) => {},
                        _ => {
                            return Err(
                                self.error(DecodeErrorKind::UnexpectedPunctuation(']'), start)
                            )
                        },
                    }
                    let Some(Container::Array(items)) = self.stack.pop() else {
                        unreachable!("top of stack checked above");
                    };
                    self.place(Value::Array(items), idx)?;
                },

                TokenKind::Identifier => {
                    // Identifiers only appear as object keys: the previous
                    // token must open the member list or follow a comma,
                    // and the next token must be a colon.
                    let key_position = matches!(
                        self.stack.last(),
                        Some(Container::Object { last_key: None, .. })
                    );
                    if !key_position {
                        return Err(self.error(DecodeErrorKind::ExpectingValue, start));
                    }
                    let prev = idx.checked_sub(1).map(|i| self.tokens[i].kind);
                    if !matches!(prev, Some(TokenKind::BraceOpen | TokenKind::Comma)) {
                        return Err(self.error(DecodeErrorKind::ExpectingPunctuation(','), start));
                    }
                    if self.tokens.get(idx + 1).map(|t| t.kind) != Some(TokenKind::Colon) {
                        return Err(self.error(DecodeErrorKind::ExpectingPunctuation(':'), start));
                    }
                    let text = token.text(self.doc).to_string();
                    self.set_last_key(text);
                },

                TokenKind::Str => {
                    let parsed = self.parse_string(token.text(self.doc), start)?;
                    let key_position = matches!(
                        self.stack.last(),
                        Some(Container::Object { last_key: None, .. })
                    );
                    if key_position {
                        // A string key sits in the same position an
                        // identifier key does: right after the opening
                        // brace or a comma.
                        let prev = idx.checked_sub(1).map(|i| self.tokens[i].kind);
                        if !matches!(prev, Some(TokenKind::BraceOpen | TokenKind::Comma)) {
                            return Err(
                                self.error(DecodeErrorKind::ExpectingPunctuation(','), start)
                            );
                        }
                        self.set_last_key(parsed);
                    } else {
                        self.attach_scalar(Value::Str(parsed), idx)?;
                    }
                },

                TokenKind::Number => {
                    let value = self.parse_number(token.text(self.doc), start)?;
                    self.attach_scalar(value, idx)?;
                },

                TokenKind::Bool => {
                    let value = Value::Bool(token.text(self.doc) == "true");
                    self.attach_scalar(value, idx)?;
                },

                TokenKind::Null => {
                    self.attach_scalar(Value::Null, idx)?;
                },

                TokenKind::Colon => {
                    match self.stack.last() {
                        None => return Err(self.error(DecodeErrorKind::ExpectingValue, start)),
                        Some(Container::Object {
                            last_key: Some(_), ..
                        }) => {},
                        _ => {
                            return Err(
                                self.error(DecodeErrorKind::UnexpectedPunctuation(':'), start)
                            )
                        },
                    }
                    // A value must follow the colon.
                    match self.tokens.get(idx + 1) {
                        None => return Err(self.error(DecodeErrorKind::ExpectingValue, start)),
                        Some(next) if next.kind == TokenKind::Identifier => {
                            return Err(self.error(
                                DecodeErrorKind::UnexpectedTokenAfterColon(next.kind.describe()),
                                next.span.start,
                            ));
                        },
                        Some(next) if !next.kind.starts_value() => {
                            let punct = next.text(self.doc).chars().next().unwrap_or('?');
                            return Err(self.error(
                                DecodeErrorKind::UnexpectedPunctuation(punct),
                                next.span.start,
                            ));
                        },
                        Some(_) => {},
                    }
                },

                TokenKind::Comma => {
                    let prev = idx.checked_sub(1).map(|i| self.tokens[i].kind);
                    match self.stack.last() {
                        None => {
                            return Err(
                                self.error(DecodeErrorKind::UnexpectedPunctuation(','), start)
                            )
                        },
                        Some(Container::Object { last_key, .. }) => {
                            if last_key.is_some() {
                                return Err(
                                    self.error(DecodeErrorKind::ExpectingPunctuation(':'), start)
                                );
                            }
                            if !prev.is_some_and(TokenKind::closes_value) {
                                return Err(
                                    self.error(DecodeErrorKind::UnexpectedPunctuation(','), start)
                                );
                            }
                        },
                        Some(Container::Array(_)) => {
                            if !prev.is_some_and(TokenKind::closes_value) {
                                return Err(
                                    self.error(DecodeErrorKind::UnexpectedPunctuation(','), start)
                                );
                            }
                        },
                    }
                },
            }
        }

        // Every container must be closed by the end of input.
        let last = self.tokens[self.tokens.len() - 1];
        if !self.stack.is_empty() {
            return Err(self.error(DecodeErrorKind::ExpectingValue, last.span.start));
        }
        match self.root {
            Some(root) => Ok((root, last.span.end)),
            None => Err(self.error(DecodeErrorKind::ExpectingValue, last.span.start)),
        }
    }

    fn error(&self, kind: DecodeErrorKind, pos: usize) -> DecodeError {
        DecodeError::new(kind, self.doc, pos)
    }

    /// Validates the position a new container opens in. Inside an array the
    /// previous token must be a comma or the opening bracket; inside an
    /// object a key must be pending.
    fn check_container_position(&self, idx: usize) -> Result<(), DecodeError> {
        let start = self.tokens[idx].span.start;
        match self.stack.last() {
            None => Ok(()),
            Some(Container::Object { last_key, .. }) => {
                if last_key.is_some() {
                    Ok(())
                } else {
                    Err(self.error(DecodeErrorKind::ExpectingPropertyName, start))
                }
            },
            Some(Container::Array(_)) => self.check_array_separator(idx),
        }
    }

    /// An array element must follow the opening bracket or a comma.
    fn check_array_separator(&self, idx: usize) -> Result<(), DecodeError> {
        let prev = idx.checked_sub(1).map(|i| self.tokens[i].kind);
        if matches!(prev, Some(TokenKind::BracketOpen | TokenKind::Comma)) {
            Ok(())
        } else {
            Err(self.error(
                DecodeErrorKind::ExpectingPunctuation(','),
                self.tokens[idx].span.start,
            ))
        }
    }

    fn set_last_key(&mut self, key: String) {
        if let Some(Container::Object { last_key, .. }) = self.stack.last_mut() {
            *last_key = Some(key);
        }
    }

    /// Attaches a scalar to the top of the stack, validating the array
    /// separator position first.
    fn attach_scalar(&mut self, value: Value, idx: usize) -> Result<(), DecodeError> {
        if let Some(Container::Array(_)) = self.stack.last() {
            self.check_array_separator(idx)?;
        }
        self.place(value, idx)
    }

    /// Attaches a completed value to the top of the stack, or publishes it
    /// as the root when the stack is empty.
    fn place(&mut self, value: Value, idx: usize) -> Result<(), DecodeError> {
        let start = self.tokens[idx].span.start;
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(self.error(DecodeErrorKind::MultipleRoot, start));
                }
                self.root = Some(value);
                Ok(())
            },
            Some(Container::Array(items)) => {
                items.push(value);
                Ok(())
            },
            Some(Container::Object { acc, last_key }) => {
                let Some(key) = last_key.take() else {
                    return Err(self.error(DecodeErrorKind::ExpectingPropertyName, start));
                };
                match acc {
                    Accumulator::Map(map) => {
                        map.insert(key, value);
                    },
                    Accumulator::Pairs(pairs) => {
                        pairs.push((key, value));
                    },
                }
                Ok(())
            },
        }
    }

    /// Materializes a completed object. The pairs hook only ever sees the
    /// root; nested pair lists fold into plain objects (last value wins),
    /// the same construction the no-hook path uses.
    fn finish_object(&self, acc: Accumulator, is_root: bool) -> Value {
        match acc {
            Accumulator::Pairs(pairs) => match &self.decoder.object_pairs_hook {
                Some(hook) if is_root => hook(pairs),
                _ => Value::Object(pairs.into_iter().collect()),
            },
            Accumulator::Map(map) => match &self.decoder.object_hook {
                Some(hook) => hook(map),
                None => Value::Object(map),
            },
        }
    }

    /// Parses a number token's literal text.
    fn parse_number(&self, text: &str, pos: usize) -> Result<Value, DecodeError> {
        if text.contains("Infinity") {
            return match &self.decoder.parse_constant {
                Some(hook) => hook(text),
                None => Ok(Value::Float(if text.starts_with('-') {
                    f64::NEG_INFINITY
                } else {
                    f64::INFINITY
                })),
            };
        }
        if text.contains("NaN") {
            return match &self.decoder.parse_constant {
                Some(hook) => hook(text),
                None => Ok(Value::Float(if text.starts_with('-') {
                    -f64::NAN
                } else {
                    f64::NAN
                })),
            };
        }
        if text.contains("0x") || text.contains("0X") {
            return Ok(self.parse_hex(text));
        }
        if text.contains('.') || text.contains('e') || text.contains('E') {
            return match &self.decoder.parse_float {
                Some(hook) => hook(text),
                None => text
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| self.error(DecodeErrorKind::NoNumber, pos)),
            };
        }
        match &self.decoder.parse_int {
            Some(hook) => hook(text),
            None => match text.parse::<i64>() {
                Ok(value) => Ok(Value::Int(value)),
                // Magnitude beyond the integer width widens to float.
                Err(_) => text
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| self.error(DecodeErrorKind::NoNumber, pos)),
            },
        }
    }

    /// Parses a (possibly signed) hexadecimal literal, widening to float
    /// when the magnitude exceeds the integer width.
    fn parse_hex(&self, text: &str) -> Value {
        let (negative, rest) = match text.as_bytes().first() {
            Some(b'-') => (true, &text[1..]),
            Some(b'+') => (false, &text[1..]),
            _ => (false, text),
        };
        let digits = &rest[2..]; // past the 0x/0X prefix
        match i64::from_str_radix(digits, 16) {
            Ok(value) => Value::Int(if negative { -value } else { value }),
            Err(_) => {
                let mut wide = 0.0f64;
                for c in digits.chars() {
                    wide = wide * 16.0 + f64::from(unicode::hex_digit_to_value(c).unwrap_or(0));
                }
                Value::Float(if negative { -wide } else { wide })
            },
        }
    }

    /// Translates the escapes of a string token's content.
    ///
    /// `content_start` is the byte offset of the content (just past the
    /// opening quote) in the document, used to anchor errors.
    fn parse_string(&self, raw: &str, content_start: usize) -> Result<String, DecodeError> {
        if !raw.contains('\\') {
            return Ok(raw.to_string());
        }

        let mut out = String::with_capacity(raw.len());
        let mut iter = raw.char_indices().peekable();

        while let Some((i, c)) = iter.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            let escape_pos = content_start + i;
            let Some(&(_, e)) = iter.peek() else {
                return Err(self.error(DecodeErrorKind::UnexpectedEof, escape_pos));
            };

            match e {
                // Line continuation: the backslash, the newline, and any
                // spaces on either side of it are all elided.
                '\n' => {
                    iter.next();
                    Self::skip_continuation_padding(&mut iter);
                },
                e if e != '\n' && consts::is_whitespace(e) => {
                    let mut reached_newline = false;
                    while let Some(&(_, w)) = iter.peek() {
                        if w == '\n' {
                            iter.next();
                            reached_newline = true;
                            break;
                        }
                        if consts::is_whitespace(w) {
                            iter.next();
                        } else {
                            break;
                        }
                    }
                    if !reached_newline {
                        return Err(
                            self.error(DecodeErrorKind::BadStringContinuation, escape_pos)
                        );
                    }
                    Self::skip_continuation_padding(&mut iter);
                },
                'n' | 'r' | 't' | '0' if self.decoder.strict => {
                    return Err(self.error(DecodeErrorKind::InvalidControlChar, escape_pos));
                },
                'x' => {
                    iter.next();
                    let code = self.take_escape_hex(&mut iter, 2, escape_pos)?;
                    out.push(self.codepoint(code, escape_pos)?);
                },
                'u' => {
                    iter.next();
                    let code = self.take_escape_hex(&mut iter, 4, escape_pos)?;
                    if (0xD800..=0xDBFF).contains(&code) {
                        let low = self.take_low_surrogate(&mut iter, code, escape_pos)?;
                        let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                        out.push(self.codepoint(combined, escape_pos)?);
                    } else if (0xDC00..=0xDFFF).contains(&code) {
                        return Err(self.error(
                            DecodeErrorKind::UnexpectedEscapeSequence(format!("\\u{code:04x}")),
                            escape_pos,
                        ));
                    } else {
                        out.push(self.codepoint(code, escape_pos)?);
                    }
                },
                e => match consts::escape_char(e) {
                    Some(mapped) => {
                        iter.next();
                        out.push(mapped);
                    },
                    None => {
                        return Err(self.error(
                            DecodeErrorKind::UnexpectedEscapeSequence(format!("\\{e}")),
                            escape_pos,
                        ));
                    },
                },
            }
        }

        Ok(out)
    }

    /// Skips spaces immediately following a continuation's newline.
    fn skip_continuation_padding(iter: &mut std::iter::Peekable<std::str::CharIndices<'_>>) {
        while let Some(&(_, c)) = iter.peek() {
            if c == ' ' {
                iter.next();
            } else {
                break;
            }
        }
    }

    /// Reads `count` hex digits of a `\x`/`\u` escape.
    fn take_escape_hex(
        &self,
        iter: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
        count: usize,
        escape_pos: usize,
    ) -> Result<u32, DecodeError> {
        let mut value = 0u32;
        for _ in 0..count {
            let digit = iter
                .next()
                .and_then(|(_, c)| unicode::hex_digit_to_value(c))
                .ok_or_else(|| self.error(DecodeErrorKind::UnexpectedEof, escape_pos))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    /// After a high surrogate, a `\uDC00`-`\uDFFF` escape must follow.
    fn take_low_surrogate(
        &self,
        iter: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
        high: u32,
        escape_pos: usize,
    ) -> Result<u32, DecodeError> {
        let unpaired = || {
            self.error(
                DecodeErrorKind::UnexpectedEscapeSequence(format!("\\u{high:04x}")),
                escape_pos,
            )
        };
        if iter.next().map(|(_, c)| c) != Some('\\') {
            return Err(unpaired());
        }
        if iter.next().map(|(_, c)| c) != Some('u') {
            return Err(unpaired());
        }
        let low = self.take_escape_hex(iter, 4, escape_pos)?;
        if (0xDC00..=0xDFFF).contains(&low) {
            Ok(low)
        } else {
            Err(unpaired())
        }
    }

    fn codepoint(&self, code: u32, escape_pos: usize) -> Result<char, DecodeError> {
        char::from_u32(code).ok_or_else(|| {
            self.error(
                DecodeErrorKind::UnexpectedEscapeSequence(format!("\\u{code:04x}")),
                escape_pos,
            )
        })
    }
}

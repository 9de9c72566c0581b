//! JSON5 encoder.
//!
//! Serializes any [`Encode`] value to JSON5 text with configurable
//! whitespace, escaping, quoting, trailing-comma, and key-ordering
//! policies. When pretty-printing with a [`CommentSchema`], block and
//! inline comments are injected next to the matching object members.
//!
//! The encoder itself holds configuration only and is reusable; each
//! encode call runs with its own cycle-detection set and comment cache,
//! torn down on success and failure alike.

use std::fmt;

use rustc_hash::FxHashSet;

use quint_util::EncodeError;

use crate::comments::{extend_key_path, CommentMap, CommentSchema, MemberComments};
use crate::encode::{Encode, KeyShape, Shape};
use crate::value::Value;

/// Quotation style for object keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyQuotation {
    /// Wrap keys in double quotes (the default).
    #[default]
    Double,
    /// Wrap keys in single quotes.
    Single,
    /// Emit keys bare. Only valid when every key is a syntactically valid
    /// identifier; the encoder leaves that guarantee to the caller.
    Bare,
}

/// Fallback invoked for values of unsupported kinds. Returning `None`
/// raises an unable-to-encode error.
pub type DefaultHook = Box<dyn Fn(&dyn std::any::Any) -> Option<Value>>;

/// A reusable JSON5 encoder.
///
/// Configured builder-style; all settings default to the compact,
/// ASCII-safe, NaN-permitting profile:
///
/// ```
/// use quint::{Encoder, Value};
///
/// let mut map = quint::Map::new();
/// map.insert("a".to_string(), Value::Int(1));
/// let text = Encoder::new().encode(&Value::Object(map)).unwrap();
/// assert_eq!(text, "{\"a\": 1}");
/// ```
pub struct Encoder {
    skip_keys: bool,
    ensure_ascii: bool,
    check_circular: bool,
    allow_nan: bool,
    indent: Option<usize>,
    separators: Option<(String, String)>,
    sort_keys: bool,
    key_quotation: KeyQuotation,
    trailing_comma: Option<bool>,
    default: Option<DefaultHook>,
}

impl Encoder {
    /// Creates an encoder with default configuration.
    pub fn new() -> Self {
        Self {
            skip_keys: false,
            ensure_ascii: true,
            check_circular: true,
            allow_nan: true,
            indent: None,
            separators: None,
            sort_keys: false,
            key_quotation: KeyQuotation::Double,
            trailing_comma: None,
            default: None,
        }
    }

    /// Skip object members whose keys have no string form instead of
    /// raising an invalid-key-type error.
    pub fn skip_keys(mut self, skip: bool) -> Self {
        self.skip_keys = skip;
        self
    }

    /// Escape every non-ASCII code point as `\uHHHH` (surrogate pairs for
    /// supplementary planes). On by default.
    pub fn ensure_ascii(mut self, ensure: bool) -> Self {
        self.ensure_ascii = ensure;
        self
    }

    /// Track containers on the encoding stack and fail on re-entry. On by
    /// default; disabling it trusts the input to be acyclic.
    pub fn check_circular(mut self, check: bool) -> Self {
        self.check_circular = check;
        self
    }

    /// Permit `NaN`/`Infinity`/`-Infinity`. When disabled, non-finite
    /// floats raise a float-out-of-range error.
    pub fn allow_nan(mut self, allow: bool) -> Self {
        self.allow_nan = allow;
        self
    }

    /// Pretty-print with the given number of spaces per level. Also
    /// switches the default item separator to a bare comma and turns
    /// trailing commas on (unless overridden).
    pub fn indent(mut self, spaces: usize) -> Self {
        self.indent = Some(spaces);
        self
    }

    /// Overrides the item and key-value separators verbatim.
    pub fn separators(mut self, item: impl Into<String>, key: impl Into<String>) -> Self {
        self.separators = Some((item.into(), key.into()));
        self
    }

    /// Emit object members in lexicographic key order (stable).
    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    /// Sets the quotation style for object keys.
    pub fn key_quotation(mut self, quotation: KeyQuotation) -> Self {
        self.key_quotation = quotation;
        self
    }

    /// Forces trailing commas on or off. Unset, trailing commas follow the
    /// indent setting.
    pub fn trailing_comma(mut self, trailing: bool) -> Self {
        self.trailing_comma = Some(trailing);
        self
    }

    /// Installs the fallback invoked for values of unsupported kinds. The
    /// returned value is encoded in the original's place.
    pub fn default_fallback(
        mut self,
        hook: impl Fn(&dyn std::any::Any) -> Option<Value> + 'static,
    ) -> Self {
        self.default = Some(Box::new(hook));
        self
    }

    /// Encodes a value to a JSON5 string.
    pub fn encode(&self, value: &dyn Encode) -> Result<String, EncodeError> {
        self.encode_with_schema(value, None)
    }

    /// Encodes a value, injecting comments from `schema` when
    /// pretty-printing is active.
    pub fn encode_with_schema(
        &self,
        value: &dyn Encode,
        schema: Option<&dyn CommentSchema>,
    ) -> Result<String, EncodeError> {
        // The comment cache is only materialized when it can be used:
        // comment injection requires an indent.
        let comments = match (schema, self.indent) {
            (Some(schema), Some(_)) => schema.comment_map()?,
            _ => CommentMap::default(),
        };

        let (item_separator, key_separator) = match &self.separators {
            Some((item, key)) => (item.clone(), key.clone()),
            None => {
                if self.indent.is_some() {
                    (",".to_string(), ": ".to_string())
                } else {
                    (", ".to_string(), ": ".to_string())
                }
            },
        };

        let mut run = Run {
            encoder: self,
            indent_str: self.indent.map(|n| " ".repeat(n)),
            item_separator,
            key_separator,
            trailing_comma: self.trailing_comma.unwrap_or(self.indent.is_some()),
            comments,
            active: FxHashSet::default(),
            out: String::new(),
        };
        run.emit_value(value, 0, "")?;
        Ok(run.out)
    }

    /// Encodes a value into `writer` and appends a trailing newline.
    pub fn to_writer<W: std::io::Write>(
        &self,
        value: &dyn Encode,
        schema: Option<&dyn CommentSchema>,
        mut writer: W,
    ) -> Result<(), crate::WriteError> {
        let text = self.encode_with_schema(value, schema)?;
        writer.write_all(text.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-call encoding state: resolved separators, the comment cache, and
/// the identity set of containers currently on the encoding stack.
struct Run<'e> {
    encoder: &'e Encoder,
    indent_str: Option<String>,
    item_separator: String,
    key_separator: String,
    trailing_comma: bool,
    comments: CommentMap,
    active: FxHashSet<usize>,
    out: String,
}

impl Run<'_> {
    fn emit_value(
        &mut self,
        value: &dyn Encode,
        level: usize,
        key_path: &str,
    ) -> Result<(), EncodeError> {
        match value.shape() {
            Shape::Null => {
                self.out.push_str("null");
                Ok(())
            },
            Shape::Bool(true) => {
                self.out.push_str("true");
                Ok(())
            },
            Shape::Bool(false) => {
                self.out.push_str("false");
                Ok(())
            },
            Shape::Int(i) => {
                self.out.push_str(&i.to_string());
                Ok(())
            },
            Shape::Float(f) => {
                let repr = self.float_repr(f)?;
                self.out.push_str(&repr);
                Ok(())
            },
            Shape::Str(s) => {
                let quoted = self.quote_string(s, false);
                self.out.push_str(&quoted);
                Ok(())
            },
            Shape::Array(items) => self.emit_array(value.obj_id(), &items, level, key_path),
            Shape::Object(members) => self.emit_object(value.obj_id(), members, level, key_path),
            Shape::Other {
                value: opaque,
                type_name,
            } => {
                let id = value.obj_id();
                self.enter(id)?;
                let result = (|| {
                    let hook = self
                        .encoder
                        .default
                        .as_ref()
                        .ok_or(EncodeError::UnableToEncode(type_name))?;
                    let converted = hook(opaque).ok_or(EncodeError::UnableToEncode(type_name))?;
                    self.emit_value(&converted, level, key_path)
                })();
                self.leave(id);
                result
            },
        }
    }

    fn emit_array(
        &mut self,
        id: usize,
        items: &[&dyn Encode],
        level: usize,
        key_path: &str,
    ) -> Result<(), EncodeError> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.enter(id)?;
        let result = self.emit_array_inner(items, level, key_path);
        self.leave(id);
        result
    }

    fn emit_array_inner(
        &mut self,
        items: &[&dyn Encode],
        level: usize,
        key_path: &str,
    ) -> Result<(), EncodeError> {
        let newline_indent = self.newline_indent(level + 1);

        self.out.push('[');
        if let Some(indent) = &newline_indent {
            self.out.push_str(indent);
        }

        for (idx, item) in items.iter().enumerate() {
            if idx > 0 {
                let separator = self.item_separator.clone();
                self.out.push_str(&separator);
                if let Some(indent) = &newline_indent {
                    self.out.push_str(indent);
                }
            }
            // Array elements do not extend the key path; comments attach
            // to object members only.
            self.emit_value(*item, level + 1, key_path)?;
        }

        if self.trailing_comma {
            let separator = self.item_separator.clone();
            self.out.push_str(&separator);
        }
        if let Some(indent) = self.newline_indent(level) {
            self.out.push_str(&indent);
        }
        self.out.push(']');
        Ok(())
    }

    fn emit_object(
        &mut self,
        id: usize,
        members: Vec<(KeyShape<'_>, &dyn Encode)>,
        level: usize,
        key_path: &str,
    ) -> Result<(), EncodeError> {
        // Keys are resolved to their string form (and skipped where
        // configured) before anything is emitted, so an object whose
        // members are all skipped still prints as `{}`.
        let mut resolved: Vec<(String, &dyn Encode)> = Vec::with_capacity(members.len());
        for (key, value) in members {
            let key = match key {
                KeyShape::Str(s) => s.to_string(),
                KeyShape::Bool(true) => "true".to_string(),
                KeyShape::Bool(false) => "false".to_string(),
                KeyShape::Int(i) => i.to_string(),
                KeyShape::Float(f) => self.float_repr(f)?,
                KeyShape::Null => "null".to_string(),
                KeyShape::Other { type_name } => {
                    if self.encoder.skip_keys {
                        continue;
                    }
                    return Err(EncodeError::InvalidKeyType(type_name));
                },
            };
            resolved.push((key, value));
        }

        if resolved.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }

        if self.encoder.sort_keys {
            resolved.sort_by(|a, b| a.0.cmp(&b.0));
        }

        self.enter(id)?;
        let result = self.emit_object_inner(resolved, level, key_path);
        self.leave(id);
        result
    }

    fn emit_object_inner(
        &mut self,
        members: Vec<(String, &dyn Encode)>,
        level: usize,
        key_path: &str,
    ) -> Result<(), EncodeError> {
        let newline_indent = self.newline_indent(level + 1);

        self.out.push('{');
        if let Some(indent) = &newline_indent {
            self.out.push_str(indent);
        }

        let total = members.len();
        for (idx, (key, value)) in members.into_iter().enumerate() {
            let member_path = extend_key_path(key_path, &key);
            let MemberComments { block, inline } =
                self.comments.get(&member_path).cloned().unwrap_or_default();

            if idx > 0 {
                if let Some(indent) = &newline_indent {
                    self.out.push_str(indent);
                }
            }
            if let Some(indent) = &newline_indent {
                for line in &block {
                    self.out.push_str("// ");
                    self.out.push_str(line);
                    self.out.push_str(indent);
                }
            }

            let quoted_key = self.quote_string(&key, true);
            self.out.push_str(&quoted_key);
            let key_separator = self.key_separator.clone();
            self.out.push_str(&key_separator);

            self.emit_value(value, level + 1, &member_path)?;

            if idx != total - 1 || self.trailing_comma {
                let separator = self.item_separator.clone();
                self.out.push_str(&separator);
            }
            if newline_indent.is_some() {
                if let Some(inline) = &inline {
                    self.out.push_str("  // ");
                    self.out.push_str(inline);
                }
            }
        }

        if let Some(indent) = self.newline_indent(level) {
            self.out.push_str(&indent);
        }
        self.out.push('}');
        Ok(())
    }

    /// Returns `"\n" + indent * level` when pretty-printing, `None` when
    /// compact.
    fn newline_indent(&self, level: usize) -> Option<String> {
        self.indent_str.as_ref().map(|indent| {
            let mut s = String::with_capacity(1 + indent.len() * level);
            s.push('\n');
            for _ in 0..level {
                s.push_str(indent);
            }
            s
        })
    }

    fn enter(&mut self, id: usize) -> Result<(), EncodeError> {
        if self.encoder.check_circular && !self.active.insert(id) {
            return Err(EncodeError::CircularReference);
        }
        Ok(())
    }

    fn leave(&mut self, id: usize) {
        if self.encoder.check_circular {
            self.active.remove(&id);
        }
    }

    /// The textual form of a float: `NaN`/`Infinity`/`-Infinity` for
    /// non-finite values (policed by `allow_nan`), otherwise the shortest
    /// representation that round-trips, keeping a `.0` suffix on integral
    /// values so float-ness survives a decode.
    fn float_repr(&self, f: f64) -> Result<String, EncodeError> {
        if f.is_finite() {
            return Ok(format!("{f:?}"));
        }
        if !self.encoder.allow_nan {
            return Err(EncodeError::FloatOutOfRange(f));
        }
        Ok(if f.is_nan() {
            "NaN".to_string()
        } else if f > 0.0 {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        })
    }

    /// Escapes and quotes a string. Values always use double quotes; keys
    /// follow the configured quotation style.
    fn quote_string(&self, s: &str, as_key: bool) -> String {
        let quote = if as_key {
            match self.encoder.key_quotation {
                KeyQuotation::Double => Some('"'),
                KeyQuotation::Single => Some('\''),
                KeyQuotation::Bare => None,
            }
        } else {
            Some('"')
        };

        let mut out = String::with_capacity(s.len() + 2);
        if let Some(q) = quote {
            out.push(q);
        }
        for c in s.chars() {
            self.escape_char_into(&mut out, c, quote);
        }
        if let Some(q) = quote {
            out.push(q);
        }
        out
    }

    fn escape_char_into(&self, out: &mut String, c: char, quote: Option<char>) {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' if quote == Some('\'') => out.push_str("\\'"),
            '\u{0008}' => out.push_str("\\b"),
            '\u{000C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            },
            c if self.encoder.ensure_ascii && (c as u32) >= 0x7F => {
                let code = c as u32;
                if code < 0x10000 {
                    out.push_str(&format!("\\u{code:04x}"));
                } else {
                    // Split supplementary-plane scalars into a surrogate
                    // pair.
                    let reduced = code - 0x10000;
                    let high = 0xD800 | ((reduced >> 10) & 0x3FF);
                    let low = 0xDC00 | (reduced & 0x3FF);
                    out.push_str(&format!("\\u{high:04x}\\u{low:04x}"));
                }
            },
            c => out.push(c),
        }
    }
}

/// `Display` renders the compact encoding. Infallible for plain value
/// trees, which cannot contain cycles or unsupported kinds.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = Encoder::new().encode(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

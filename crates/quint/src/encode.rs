//! The encoder's input contract.
//!
//! [`Encode`] classifies a host value into one of the JSON5 shapes the
//! encoder understands. [`Value`] implements it, as do the common standard
//! types, so both decoded trees and ordinary Rust data structures can be
//! serialized. A type the encoder has no shape for reports
//! [`Shape::Other`]; such values are routed through the encoder's `default`
//! fallback, and object keys of unsupported kinds are governed by the
//! `skip_keys` setting.

use std::any::Any;
use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;

use crate::value::Value;

/// Shape of a value presented to the encoder.
pub enum Shape<'a> {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(&'a str),
    /// Ordered element sequence.
    Array(Vec<&'a dyn Encode>),
    /// Ordered member sequence. Key order is preserved unless the encoder
    /// is configured to sort.
    Object(Vec<(KeyShape<'a>, &'a dyn Encode)>),
    /// Not directly encodable; handled by the `default` fallback.
    Other {
        value: &'a dyn Any,
        type_name: &'static str,
    },
}

impl<'a> Shape<'a> {
    /// Builds the [`Shape::Other`] variant, capturing the type name for
    /// diagnostics.
    pub fn other<T: Any>(value: &'a T) -> Self {
        Shape::Other {
            value,
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Shape of an object key.
///
/// Non-string scalar keys are converted to their JSON5 scalar form and then
/// treated as string keys; [`KeyShape::Other`] keys are skipped or rejected
/// depending on the encoder's `skip_keys` setting.
pub enum KeyShape<'a> {
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Float(f64),
    Null,
    Other { type_name: &'static str },
}

/// A value that can be serialized as JSON5.
pub trait Encode {
    /// Classifies this value for the encoder.
    fn shape(&self) -> Shape<'_>;

    /// Stable per-object identity used for cycle detection. The default is
    /// the value's address, which identifies the shared allocation when a
    /// container is reachable through `Rc`-like handles.
    fn obj_id(&self) -> usize {
        (self as *const Self).cast::<()>() as usize
    }
}

/// A key type usable in encodable maps.
pub trait EncodeKey {
    fn key_shape(&self) -> KeyShape<'_>;
}

impl Encode for Value {
    fn shape(&self) -> Shape<'_> {
        match self {
            Value::Null => Shape::Null,
            Value::Bool(b) => Shape::Bool(*b),
            Value::Int(i) => Shape::Int(*i),
            Value::Float(f) => Shape::Float(*f),
            Value::Str(s) => Shape::Str(s),
            Value::Array(items) => Shape::Array(items.iter().map(|v| v as &dyn Encode).collect()),
            Value::Object(map) => Shape::Object(
                map.iter()
                    .map(|(k, v)| (KeyShape::Str(k.as_str()), v as &dyn Encode))
                    .collect(),
            ),
        }
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn obj_id(&self) -> usize {
        (**self).obj_id()
    }
}

impl Encode for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Bool(*self)
    }
}

macro_rules! encode_int {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn shape(&self) -> Shape<'_> {
                    Shape::Int(i64::from(*self))
                }
            }
        )*
    };
}

encode_int!(i8, i16, i32, i64, u8, u16, u32);

impl Encode for u64 {
    fn shape(&self) -> Shape<'_> {
        match i64::try_from(*self) {
            Ok(i) => Shape::Int(i),
            Err(_) => Shape::Float(*self as f64),
        }
    }
}

impl Encode for usize {
    fn shape(&self) -> Shape<'_> {
        match i64::try_from(*self) {
            Ok(i) => Shape::Int(i),
            Err(_) => Shape::Float(*self as f64),
        }
    }
}

impl Encode for f32 {
    fn shape(&self) -> Shape<'_> {
        Shape::Float(f64::from(*self))
    }
}

impl Encode for f64 {
    fn shape(&self) -> Shape<'_> {
        Shape::Float(*self)
    }
}

impl Encode for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }
}

impl Encode for String {
    fn shape(&self) -> Shape<'_> {
        Shape::Str(self)
    }
}

impl<T: Encode> Encode for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(value) => value.shape(),
            None => Shape::Null,
        }
    }
}

impl<T: Encode> Encode for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(self.iter().map(|v| v as &dyn Encode).collect())
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Array(self.iter().map(|v| v as &dyn Encode).collect())
    }

    fn obj_id(&self) -> usize {
        self.as_ptr() as usize
    }
}

impl<K: EncodeKey, V: Encode> Encode for IndexMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Object(
            self.iter()
                .map(|(k, v)| (k.key_shape(), v as &dyn Encode))
                .collect(),
        )
    }
}

impl<K: EncodeKey, V: Encode> Encode for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Object(
            self.iter()
                .map(|(k, v)| (k.key_shape(), v as &dyn Encode))
                .collect(),
        )
    }
}

impl<K: EncodeKey, V: Encode, S: std::hash::BuildHasher> Encode for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Object(
            self.iter()
                .map(|(k, v)| (k.key_shape(), v as &dyn Encode))
                .collect(),
        )
    }
}

impl EncodeKey for str {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Str(self)
    }
}

impl EncodeKey for String {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Str(self)
    }
}

impl EncodeKey for &str {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Str(self)
    }
}

impl EncodeKey for bool {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Bool(*self)
    }
}

impl EncodeKey for i64 {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Int(*self)
    }
}

impl EncodeKey for i32 {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Int(i64::from(*self))
    }
}

impl EncodeKey for f64 {
    fn key_shape(&self) -> KeyShape<'_> {
        KeyShape::Float(*self)
    }
}

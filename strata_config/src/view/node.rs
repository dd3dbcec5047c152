//! Nodes stored inside a [`Layer`].

use std::sync::Arc;

use chrono::NaiveDateTime;

use super::{Key, Layer};
use crate::value::{Scalar, Value};

/// A value inside a view: a scalar, a sequence, or a nested [`Layer`].
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Leaf value.
    Scalar(Scalar),
    /// Ordered sequence whose mapping elements are wrapped as layers.
    Sequence(Arc<[Node]>),
    /// Nested mapping.
    Layer(Layer),
}

impl Node {
    /// Wrap a plain value.
    #[must_use]
    pub fn wrap(value: Value) -> Self {
        match value {
            Value::Scalar(scalar) => Self::Scalar(scalar),
            Value::Sequence(items) => Self::Sequence(items.into_iter().map(Self::wrap).collect()),
            Value::Mapping(map) => Self::Layer(Layer::wrap(map)),
        }
    }

    /// Convert back into a plain value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar(scalar) => Value::Scalar(scalar.clone()),
            Self::Sequence(items) => Value::Sequence(items.iter().map(Self::to_value).collect()),
            Self::Layer(layer) => Value::Mapping(layer.flatten()),
        }
    }

    /// Step into a child by key. Names index layers, integers index
    /// sequences; any other combination has no child.
    #[must_use]
    pub fn child(&self, key: &Key) -> Option<&Self> {
        match (self, key) {
            (Self::Layer(layer), Key::Name(name)) => layer.get(name),
            (Self::Sequence(items), Key::Index(index)) => items.get(*index),
            _ => None,
        }
    }

    /// Borrow the scalar, if this node is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Borrow the nested layer, if this node is one.
    #[must_use]
    pub const fn as_layer(&self) -> Option<&Layer> {
        match self {
            Self::Layer(layer) => Some(layer),
            _ => None,
        }
    }

    /// Borrow the sequence elements, if this node is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// String content of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Integer content, if it fits in `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Integer(i)) => Some(*i),
            Self::Scalar(Scalar::Unsigned(u)) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    /// Integer content, if it is non-negative.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Scalar(Scalar::Integer(i)) => u64::try_from(*i).ok(),
            Self::Scalar(Scalar::Unsigned(u)) => Some(*u),
            _ => None,
        }
    }

    /// Numeric content as a float. Integers are widened.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "configuration numbers are read as approximate floats on request"
    )]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Float(f)) => Some(*f),
            Self::Scalar(Scalar::Integer(i)) => Some(*i as f64),
            Self::Scalar(Scalar::Unsigned(u)) => Some(*u as f64),
            _ => None,
        }
    }

    /// Boolean content.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Binary content.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Scalar(Scalar::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Timestamp content.
    #[must_use]
    pub const fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Scalar(Scalar::Timestamp(ts)) => Some(*ts),
            _ => None,
        }
    }

    /// Returns `true` for a null scalar.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Self::wrap(value)
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Layer> for Node {
    fn from(layer: Layer) -> Self {
        Self::Layer(layer)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<i32> for Node {
    fn from(value: i32) -> Self {
        Self::Scalar(Scalar::Integer(i64::from(value)))
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_owned()))
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

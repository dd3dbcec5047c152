//! Snapshot value model shared by the loaders, the view and the codec.
//!
//! A [`Value`] is the plain nested form of a configuration document: a
//! scalar, an ordered sequence, or an insertion-ordered [`Mapping`] from
//! string keys to further values. Documents are always acyclic.

mod serde_impl;
#[cfg(test)]
mod tests;

use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

#[cfg(feature = "yaml")]
pub(crate) use serde_impl::ValueSeed;

/// Insertion-ordered mapping from string keys to [`Value`]s.
pub type Mapping = IndexMap<String, Value>;

/// Leaf values of a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Explicit absence (`null` in JSON, `~` in YAML).
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Signed integer. Non-negative integers that fit are stored here too.
    Integer(i64),
    /// Unsigned integer above [`i64::MAX`].
    Unsigned(u64),
    /// Floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Opaque binary blob.
    Bytes(Vec<u8>),
    /// Calendar timestamp. Only produced by the codec's timestamp hook or by
    /// records carrying [`NaiveDateTime`] fields.
    Timestamp(NaiveDateTime),
}

/// Kind tag for a [`Scalar`], used by record descriptors and diagnostics.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ScalarKind {
    /// See [`Scalar::Null`].
    Null,
    /// See [`Scalar::Bool`].
    Bool,
    /// See [`Scalar::Integer`] and [`Scalar::Unsigned`].
    Integer,
    /// See [`Scalar::Float`].
    Float,
    /// See [`Scalar::String`].
    String,
    /// See [`Scalar::Bytes`].
    Bytes,
    /// See [`Scalar::Timestamp`].
    Timestamp,
}

impl ScalarKind {
    /// Lower-case name used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Scalar {
    /// Returns the kind tag of this scalar.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::Null => ScalarKind::Null,
            Self::Bool(_) => ScalarKind::Bool,
            Self::Integer(_) | Self::Unsigned(_) => ScalarKind::Integer,
            Self::Float(_) => ScalarKind::Float,
            Self::String(_) => ScalarKind::String,
            Self::Bytes(_) => ScalarKind::Bytes,
            Self::Timestamp(_) => ScalarKind::Timestamp,
        }
    }

    /// Build an integer scalar, keeping values that fit in `i64` signed.
    #[must_use]
    pub fn from_u64(value: u64) -> Self {
        i64::try_from(value).map_or(Self::Unsigned(value), Self::Integer)
    }
}

/// One node of a configuration snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Leaf value.
    Scalar(Scalar),
    /// Ordered sequence. Order is significant and preserved.
    Sequence(Vec<Value>),
    /// String-keyed mapping with unique keys.
    Mapping(Mapping),
}

impl Default for Value {
    fn default() -> Self {
        Self::NULL
    }
}

impl Value {
    /// The `null` value.
    pub const NULL: Self = Self::Scalar(Scalar::Null);

    /// Returns `true` for [`Scalar::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Borrow the inner mapping, if this value is one.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Borrow the inner sequence, if this value is one.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Borrow the inner scalar, if this value is one.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Name of this value's shape, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(scalar) => scalar.kind().as_str(),
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Self>> for Value {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Scalar(Scalar::Bool(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Scalar(Scalar::Integer(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Scalar(Scalar::Integer(i64::from(value)))
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Self::Scalar(Scalar::from_u64(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Scalar(Scalar::Float(value))
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_owned()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::Scalar(Scalar::Timestamp(value))
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as Json;
        match value {
            Json::Null => Self::NULL,
            Json::Bool(b) => Self::from(b),
            Json::Number(n) => n.as_i64().map_or_else(
                || {
                    n.as_u64().map_or_else(
                        || Self::Scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
                        Self::from,
                    )
                },
                Self::from,
            ),
            Json::String(s) => Self::from(s),
            Json::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Json::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, item)| (key, Self::from(item)))
                    .collect(),
            ),
        }
    }
}

/// Convert a JSON object into a [`Mapping`]. Non-object JSON yields `None`.
///
/// Mostly useful in tests and producers that build documents with
/// `serde_json::json!`.
///
/// ```rust
/// use strata_config::value::mapping_from_json;
/// use serde_json::json;
///
/// let map = mapping_from_json(json!({"port": 8080})).expect("object");
/// assert_eq!(map.len(), 1);
/// ```
#[must_use]
pub fn mapping_from_json(value: serde_json::Value) -> Option<Mapping> {
    match Value::from(value) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}

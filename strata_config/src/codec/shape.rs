//! [`Shape`] implementations for scalars, containers and plain values.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use super::conform::mismatch;
use super::timestamp::parse_timestamp_lenient;
use super::{Descriptor, FieldPath};
use crate::StrataResult;
use crate::value::{Mapping, Scalar, ScalarKind, Value};

/// A type the record codec can build from, and flatten into, a [`Value`].
///
/// `from_value` receives data that has already been through
/// [`super::conform`], so nested record mappings are keyed by field name.
pub trait Shape: Sized {
    /// Declared shape of the type.
    fn descriptor() -> Descriptor;

    /// Build the typed value.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StrataError::CodecMismatch`] when `value` does not
    /// fit, or [`crate::StrataError::MissingField`] for records lacking a
    /// required field.
    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self>;

    /// Flatten into a plain value, using external names for record keys.
    fn to_value(&self) -> Value;

    /// Value used when a record field of this type is absent. `None` makes
    /// the field required.
    fn missing() -> Option<Self> {
        None
    }
}

macro_rules! signed_shape {
    ($($ty:ty),* $(,)?) => {$(
        impl Shape for $ty {
            fn descriptor() -> Descriptor {
                Descriptor::Scalar(ScalarKind::Integer)
            }

            fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
                let converted = match &value {
                    Value::Scalar(Scalar::Integer(i)) => Self::try_from(*i).ok(),
                    Value::Scalar(Scalar::Unsigned(u)) => Self::try_from(*u).ok(),
                    _ => None,
                };
                converted.ok_or_else(|| mismatch(stringify!($ty), &value, path))
            }

            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::Integer(i64::from(*self)))
            }
        }
    )*};
}

macro_rules! unsigned_shape {
    ($($ty:ty),* $(,)?) => {$(
        impl Shape for $ty {
            fn descriptor() -> Descriptor {
                Descriptor::Scalar(ScalarKind::Integer)
            }

            fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
                let converted = match &value {
                    Value::Scalar(Scalar::Integer(i)) => Self::try_from(*i).ok(),
                    Value::Scalar(Scalar::Unsigned(u)) => Self::try_from(*u).ok(),
                    _ => None,
                };
                converted.ok_or_else(|| mismatch(stringify!($ty), &value, path))
            }

            fn to_value(&self) -> Value {
                Value::Scalar(Scalar::from_u64(u64::from(*self)))
            }
        }
    )*};
}

signed_shape!(i8, i16, i32, i64);
unsigned_shape!(u8, u16, u32, u64);

impl Shape for usize {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::Integer)
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        let converted = match &value {
            Value::Scalar(Scalar::Integer(i)) => Self::try_from(*i).ok(),
            Value::Scalar(Scalar::Unsigned(u)) => Self::try_from(*u).ok(),
            _ => None,
        };
        converted.ok_or_else(|| mismatch("usize", &value, path))
    }

    fn to_value(&self) -> Value {
        u64::try_from(*self).map_or(Value::NULL, |u| Value::Scalar(Scalar::from_u64(u)))
    }
}

impl Shape for f64 {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::Float)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "integers in float fields are widened as the document intends"
    )]
    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        match value {
            Value::Scalar(Scalar::Float(f)) => Ok(f),
            Value::Scalar(Scalar::Integer(i)) => Ok(i as Self),
            Value::Scalar(Scalar::Unsigned(u)) => Ok(u as Self),
            other => Err(mismatch("float", &other, path)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Float(*self))
    }
}

impl Shape for f32 {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::Float)
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "f32 fields accept the precision they declare"
    )]
    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        f64::from_value(value, path).map(|f| f as Self)
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Float(f64::from(*self)))
    }
}

impl Shape for bool {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::Bool)
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        match value {
            Value::Scalar(Scalar::Bool(b)) => Ok(b),
            other => Err(mismatch("bool", &other, path)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Bool(*self))
    }
}

impl Shape for String {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::String)
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        match value {
            Value::Scalar(Scalar::String(s)) => Ok(s),
            other => Err(mismatch("string", &other, path)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::String(self.clone()))
    }
}

/// Binary payload stored as [`Scalar::Bytes`].
///
/// `Vec<u8>` already means "sequence of small integers", so binary fields
/// are declared with this wrapper instead.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Blob(
    /// Raw bytes.
    pub Vec<u8>,
);

impl Shape for Blob {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::Bytes)
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        match value {
            Value::Scalar(Scalar::Bytes(bytes)) => Ok(Self(bytes)),
            other => Err(mismatch("bytes", &other, path)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Bytes(self.0.clone()))
    }
}

impl Shape for NaiveDateTime {
    fn descriptor() -> Descriptor {
        Descriptor::Scalar(ScalarKind::Timestamp)
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        match value {
            Value::Scalar(Scalar::Timestamp(ts)) => Ok(ts),
            Value::Scalar(Scalar::String(text)) => {
                parse_timestamp_lenient(&text).ok_or_else(|| {
                    crate::StrataError::codec_mismatch(
                        path.as_str(),
                        "timestamp",
                        format!("string '{text}'"),
                    )
                })
            }
            other => Err(mismatch("timestamp", &other, path)),
        }
    }

    fn to_value(&self) -> Value {
        Value::Scalar(Scalar::Timestamp(*self))
    }
}

impl Shape for Value {
    fn descriptor() -> Descriptor {
        Descriptor::Any
    }

    fn from_value(value: Value, _path: &FieldPath) -> StrataResult<Self> {
        Ok(value)
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl<T: Shape> Shape for Option<T> {
    fn descriptor() -> Descriptor {
        Descriptor::optional(T::descriptor())
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value, path).map(Some)
        }
    }

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::NULL, Shape::to_value)
    }

    fn missing() -> Option<Self> {
        Some(None)
    }
}

fn sequence_items(value: Value, expected: &Descriptor, path: &FieldPath) -> StrataResult<Vec<Value>> {
    match value {
        Value::Sequence(items) => Ok(items),
        other => Err(mismatch(expected, &other, path)),
    }
}

fn collect_elements<T: Shape, C: FromIterator<T>>(
    items: Vec<Value>,
    path: &FieldPath,
) -> StrataResult<C> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| T::from_value(item, &path.index(index)))
        .collect()
}

impl<T: Shape> Shape for Vec<T> {
    fn descriptor() -> Descriptor {
        Descriptor::sequence(T::descriptor())
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        let items = sequence_items(value, &Self::descriptor(), path)?;
        collect_elements(items, path)
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(Shape::to_value).collect())
    }
}

impl<T: Shape> Shape for Box<[T]> {
    fn descriptor() -> Descriptor {
        Descriptor::tuple(T::descriptor())
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        let items = sequence_items(value, &Self::descriptor(), path)?;
        collect_elements(items, path)
    }

    fn to_value(&self) -> Value {
        Value::Sequence(self.iter().map(Shape::to_value).collect())
    }
}

fn mapping_entries(value: Value, expected: &Descriptor, path: &FieldPath) -> StrataResult<Mapping> {
    match value {
        Value::Mapping(map) => Ok(map),
        other => Err(mismatch(expected, &other, path)),
    }
}

fn collect_entries<T: Shape, C: FromIterator<(String, T)>>(
    map: Mapping,
    path: &FieldPath,
) -> StrataResult<C> {
    map.into_iter()
        .map(|(key, item)| {
            let converted = T::from_value(item, &path.field(&key))?;
            Ok((key, converted))
        })
        .collect()
}

fn flatten_entries<'a, T: Shape + 'a>(entries: impl Iterator<Item = (&'a String, &'a T)>) -> Value {
    Value::Mapping(
        entries
            .map(|(key, item)| (key.clone(), item.to_value()))
            .collect(),
    )
}

fn string_keyed(value: Descriptor) -> Descriptor {
    Descriptor::mapping(Descriptor::Scalar(ScalarKind::String), value)
}

impl<T: Shape> Shape for BTreeMap<String, T> {
    fn descriptor() -> Descriptor {
        string_keyed(T::descriptor())
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        let map = mapping_entries(value, &Self::descriptor(), path)?;
        collect_entries(map, path)
    }

    fn to_value(&self) -> Value {
        flatten_entries(self.iter())
    }
}

impl<T: Shape, S: BuildHasher + Default> Shape for HashMap<String, T, S> {
    fn descriptor() -> Descriptor {
        string_keyed(T::descriptor())
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        let map = mapping_entries(value, &Self::descriptor(), path)?;
        collect_entries(map, path)
    }

    fn to_value(&self) -> Value {
        flatten_entries(self.iter())
    }
}

impl<T: Shape, S: BuildHasher + Default> Shape for IndexMap<String, T, S> {
    fn descriptor() -> Descriptor {
        string_keyed(T::descriptor())
    }

    fn from_value(value: Value, path: &FieldPath) -> StrataResult<Self> {
        let map = mapping_entries(value, &Self::descriptor(), path)?;
        collect_entries(map, path)
    }

    fn to_value(&self) -> Value {
        flatten_entries(self.iter())
    }
}

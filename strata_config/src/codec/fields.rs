//! Field extraction used by derived `Shape::from_value` implementations.

use std::sync::Arc;

use super::conform::mismatch;
use super::{FieldPath, RecordDescriptor, Shape};
use crate::value::{Mapping, Value};
use crate::{StrataError, StrataResult};

/// Conformed record data being consumed field by field.
pub struct RecordFields<'a> {
    record: &'a RecordDescriptor,
    data: Mapping,
    path: &'a FieldPath,
}

impl<'a> RecordFields<'a> {
    /// Start consuming `value`, which must be a mapping keyed by field name.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::CodecMismatch`] if `value` is not a mapping.
    pub fn new(record: &'a RecordDescriptor, value: Value, path: &'a FieldPath) -> StrataResult<Self> {
        match value {
            Value::Mapping(data) => Ok(Self { record, data, path }),
            other => Err(mismatch(format_args!("record {}", record.name()), &other, path)),
        }
    }

    /// Remove and convert field `name`.
    ///
    /// An absent field falls back to [`Shape::missing`].
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::MissingField`] when the field is absent and its
    /// type has no missing value, or the conversion error of the field type.
    pub fn take<T: Shape>(&mut self, name: &'static str) -> StrataResult<T> {
        match self.data.shift_remove(name) {
            Some(value) => T::from_value(value, &self.child_path(name)),
            None => T::missing().ok_or_else(|| {
                Arc::new(StrataError::MissingField {
                    record: self.record.name(),
                    field: name,
                    path: self.path.to_string(),
                })
            }),
        }
    }

    /// Remove and convert field `name`, using `T::default()` when absent.
    ///
    /// # Errors
    ///
    /// Returns the conversion error of the field type.
    pub fn take_or_default<T: Shape + Default>(&mut self, name: &'static str) -> StrataResult<T> {
        self.data.shift_remove(name).map_or_else(
            || Ok(T::default()),
            |value| T::from_value(value, &self.child_path(name)),
        )
    }

    fn child_path(&self, name: &'static str) -> FieldPath {
        let external = self
            .record
            .field(name)
            .map_or(name, super::FieldDescriptor::external);
        self.path.field(external)
    }
}

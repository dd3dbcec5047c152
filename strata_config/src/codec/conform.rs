//! Descriptor-driven pass that reshapes untyped data for typed construction.

use std::sync::Arc;

use super::{Descriptor, FieldPath, RecordDescriptor};
use crate::value::{Mapping, Scalar, ScalarKind, Value};
use crate::{StrataError, StrataResult};

/// Reshape `value` according to `descriptor`.
///
/// - records require a mapping; keys are resolved through the external-name
///   table, unknown keys are dropped and known keys are renamed to field
///   names;
/// - sequences and tuples require a sequence and convert every element;
/// - mappings require a mapping and convert every value, keys unchanged;
/// - optional values accept null;
/// - scalars are checked against their kind; `Any` passes through.
///
/// # Errors
///
/// Returns [`StrataError::CodecMismatch`] naming the first offending location.
pub fn conform(descriptor: &Descriptor, value: Value, path: &FieldPath) -> StrataResult<Value> {
    match (descriptor, value) {
        (Descriptor::Any, value) => Ok(value),
        (Descriptor::Optional(_), value) if value.is_null() => Ok(value),
        (Descriptor::Optional(inner), value) => conform(inner, value, path),
        (Descriptor::Scalar(kind), Value::Scalar(scalar)) if accepts(*kind, &scalar) => {
            Ok(Value::Scalar(scalar))
        }
        (Descriptor::Sequence(element) | Descriptor::Tuple(element), Value::Sequence(items)) => {
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| conform(element, item, &path.index(index)))
                .collect::<StrataResult<Vec<_>>>()
                .map(Value::Sequence)
        }
        (Descriptor::Mapping { value: element, .. }, Value::Mapping(map)) => map
            .into_iter()
            .map(|(key, item)| {
                let converted = conform(element, item, &path.field(&key))?;
                Ok((key, converted))
            })
            .collect::<StrataResult<Mapping>>()
            .map(Value::Mapping),
        (Descriptor::Record(record), Value::Mapping(map)) => {
            conform_record(record, map, path).map(Value::Mapping)
        }
        (descriptor, value) => Err(mismatch(descriptor, &value, path)),
    }
}

fn conform_record(
    record: &RecordDescriptor,
    data: Mapping,
    path: &FieldPath,
) -> StrataResult<Mapping> {
    let mut out = Mapping::with_capacity(record.fields().len());
    for (external, value) in data {
        let Some(field) = record.field_by_external(&external) else {
            tracing::trace!(record = record.name(), key = %external, "ignoring unknown key");
            continue;
        };
        let converted = conform(field.descriptor(), value, &path.field(&external))?;
        out.insert(field.name().to_owned(), converted);
    }
    Ok(out)
}

const fn accepts(kind: ScalarKind, scalar: &Scalar) -> bool {
    matches!(
        (kind, scalar),
        (ScalarKind::Null, Scalar::Null)
            | (ScalarKind::Bool, Scalar::Bool(_))
            | (
                ScalarKind::Integer,
                Scalar::Integer(_) | Scalar::Unsigned(_)
            )
            | (
                ScalarKind::Float,
                Scalar::Float(_) | Scalar::Integer(_) | Scalar::Unsigned(_)
            )
            | (ScalarKind::String, Scalar::String(_))
            | (ScalarKind::Bytes, Scalar::Bytes(_))
            | (
                ScalarKind::Timestamp,
                Scalar::Timestamp(_) | Scalar::String(_)
            )
    )
}

pub(super) fn mismatch(
    expected: impl ToString,
    found: &Value,
    path: &FieldPath,
) -> Arc<StrataError> {
    let found = match found {
        Value::Scalar(Scalar::Integer(i)) => format!("integer {i}"),
        Value::Scalar(Scalar::Unsigned(u)) => format!("integer {u}"),
        other => other.type_name().to_owned(),
    };
    StrataError::codec_mismatch(path.as_str(), expected.to_string(), found)
}

//! Type-directed conversion between untyped [`Value`]s and declared records.
//!
//! Every convertible type implements [`Shape`], which exposes a
//! [`Descriptor`] tree built once per type. Records derive their shape with
//! `#[derive(Record)]`:
//!
//! ```rust
//! use strata_config::{Record, codec::{from_record, to_record}, value::mapping_from_json};
//! use serde_json::json;
//!
//! #[derive(Debug, PartialEq, Record)]
//! struct Endpoint {
//!     host: String,
//!     #[record(rename = "portNumber")]
//!     port: u16,
//!     tags: Vec<String>,
//! }
//!
//! let data = mapping_from_json(json!({
//!     "host": "db",
//!     "portNumber": 5432,
//!     "tags": ["primary"],
//!     "ignored": true,
//! }))
//! .expect("object");
//! let endpoint: Endpoint = to_record(data).expect("shape matches");
//! assert_eq!(endpoint.port, 5432);
//! assert!(from_record(&endpoint).contains_key("portNumber"));
//! ```
//!
//! Conversion runs in two passes. [`conform`] walks the descriptor tree,
//! checks shapes, drops keys no field claims and renames external keys to
//! field names. [`Shape::from_value`] then builds the typed value.

mod conform;
mod descriptor;
pub mod envelope;
mod fields;
mod shape;
mod timestamp;
#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::StrataResult;
use crate::value::{Mapping, Value};

pub use conform::conform;
pub use descriptor::{Descriptor, FieldDescriptor, FieldPath, RecordDescriptor};
pub use envelope::{decode_value, deserialize, deserialize_with, encode_value, serialize, serialize_with};
pub use fields::RecordFields;
pub use shape::{Blob, Shape};
pub use timestamp::{DEFAULT_TIMESTAMP_FORMAT, TIMESTAMP_MARKER, TIMESTAMP_PAYLOAD, TimestampHook};

/// Types declared as records, normally through `#[derive(Record)]`.
pub trait Record: Shape {
    /// The cached descriptor for this record type.
    fn record_descriptor() -> Arc<RecordDescriptor>;

    /// Flatten the record into a mapping keyed by external field names.
    fn to_mapping(&self) -> Mapping;
}

/// Build a `T` from untyped data.
///
/// Keys that no field claims are ignored. Missing `Option` fields and fields
/// marked `#[record(default)]` take their default; any other missing field is
/// a [`crate::StrataError::MissingField`].
///
/// # Errors
///
/// Returns [`crate::StrataError::CodecMismatch`] when the data's shape does
/// not match the declared type, or [`crate::StrataError::MissingField`] when
/// a required field is absent.
pub fn to_record<T: Shape>(data: impl Into<Value>) -> StrataResult<T> {
    let root = FieldPath::root();
    let conformed = conform(&T::descriptor(), data.into(), &root)?;
    T::from_value(conformed, &root)
}

/// Flatten a record into an owned mapping keyed by external field names.
///
/// Nested records become mappings, sequences become sequences of flattened
/// elements, and every value is copied.
#[must_use]
pub fn from_record<T: Record>(record: &T) -> Mapping {
    record.to_mapping()
}

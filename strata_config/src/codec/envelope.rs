//! MessagePack envelope for records and untyped values.
//!
//! Mapping keys are written as MessagePack `str`, blobs as `bin`, and
//! timestamps as the tagged mappings produced by [`TimestampHook`].
//!
//! ```rust
//! use strata_config::Record;
//! use strata_config::codec::{deserialize, serialize};
//!
//! #[derive(Debug, PartialEq, Record)]
//! struct Heartbeat {
//!     node: String,
//!     sequence: u64,
//! }
//!
//! let beat = Heartbeat { node: "a".into(), sequence: 7 };
//! let bytes = serialize(&beat).expect("encodes");
//! assert_eq!(deserialize::<Heartbeat>(&bytes).expect("decodes"), beat);
//! ```

use super::{Shape, TimestampHook, to_record};
use crate::value::Value;
use crate::{StrataResult, StrataResultExt};

/// Encode an untyped value, tagging timestamps with `hook`.
///
/// # Errors
///
/// Returns [`crate::StrataError::Timestamp`] if a timestamp cannot be
/// formatted, or [`crate::StrataError::Envelope`] if encoding fails.
pub fn encode_value(value: &Value, hook: &TimestampHook) -> StrataResult<Vec<u8>> {
    let tagged = hook.encode(value.clone())?;
    rmp_serde::to_vec(&tagged).into_strata()
}

/// Decode an untyped value, restoring timestamps tagged by `hook`.
///
/// # Errors
///
/// Returns [`crate::StrataError::Envelope`] for malformed bytes, or
/// [`crate::StrataError::Timestamp`] when a tagged timestamp does not match
/// the hook's format.
pub fn decode_value(bytes: &[u8], hook: &TimestampHook) -> StrataResult<Value> {
    let raw: Value = rmp_serde::from_slice(bytes).into_strata()?;
    hook.decode(raw)
}

/// Encode a record with the default [`TimestampHook`].
///
/// # Errors
///
/// See [`encode_value`].
pub fn serialize<T: Shape>(record: &T) -> StrataResult<Vec<u8>> {
    serialize_with(record, &TimestampHook::default())
}

/// Encode a record, tagging timestamps with `hook`.
///
/// # Errors
///
/// See [`encode_value`].
pub fn serialize_with<T: Shape>(record: &T, hook: &TimestampHook) -> StrataResult<Vec<u8>> {
    let tagged = hook.encode(record.to_value())?;
    rmp_serde::to_vec(&tagged).into_strata()
}

/// Decode a record encoded with the default [`TimestampHook`].
///
/// # Errors
///
/// See [`deserialize_with`].
pub fn deserialize<T: Shape>(bytes: &[u8]) -> StrataResult<T> {
    deserialize_with(bytes, &TimestampHook::default())
}

/// Decode a record, restoring timestamps tagged by `hook`.
///
/// # Errors
///
/// Returns the errors of [`decode_value`] followed by those of
/// [`to_record`].
pub fn deserialize_with<T: Shape>(bytes: &[u8], hook: &TimestampHook) -> StrataResult<T> {
    to_record(decode_value(bytes, hook)?)
}

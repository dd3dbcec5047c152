//! Tagged-mapping representation of timestamps for the binary envelope.
//!
//! MessagePack has no calendar type the codec can rely on, so timestamps
//! travel as `{"__datetime__": true, "as_str": "<formatted>"}`.

use std::borrow::Cow;
use std::fmt::Write as _;
use std::sync::Arc;

use chrono::format::ParseErrorKind;
use chrono::{NaiveDate, NaiveDateTime};

use crate::value::{Mapping, Scalar, Value};
use crate::{StrataError, StrataResult};

/// Format used by [`TimestampHook::default`].
///
/// `%.f` keeps every stored digit: fractions print with 3, 6 or 9 digits and
/// whole seconds print none. Six-digit microsecond payloads still parse.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Key whose presence marks a mapping as an encoded timestamp.
pub const TIMESTAMP_MARKER: &str = "__datetime__";

/// Key holding the formatted timestamp text.
pub const TIMESTAMP_PAYLOAD: &str = "as_str";

/// Formats used when a record field declared as a timestamp receives a
/// plain string instead of a decoded timestamp.
const LENIENT_FORMATS: &[&str] = &[DEFAULT_TIMESTAMP_FORMAT, "%Y-%m-%dT%H:%M:%S%.f"];

/// Encodes and decodes timestamps with one `chrono` format string.
///
/// Encoding and decoding must use the same format; a mismatch surfaces as
/// [`StrataError::Timestamp`] when decoding.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimestampHook {
    format: Cow<'static, str>,
}

impl Default for TimestampHook {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampHook {
    /// Hook using [`DEFAULT_TIMESTAMP_FORMAT`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            format: Cow::Borrowed(DEFAULT_TIMESTAMP_FORMAT),
        }
    }

    /// Hook using a custom `chrono` format string.
    #[must_use]
    pub fn with_format(format: impl Into<Cow<'static, str>>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// The format string in use.
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Render `timestamp` with this hook's format.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Timestamp`] if the format string is invalid.
    pub fn format_timestamp(&self, timestamp: &NaiveDateTime) -> StrataResult<String> {
        let mut out = String::new();
        write!(out, "{}", timestamp.format(&self.format)).map_err(|_| {
            Arc::new(StrataError::Timestamp {
                value: timestamp.to_string(),
                format: self.format.to_string(),
                source: None,
            })
        })?;
        Ok(out)
    }

    /// Parse `text` with this hook's format. Formats without a time of day
    /// yield midnight.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Timestamp`] when `text` does not match.
    pub fn parse_timestamp(&self, text: &str) -> StrataResult<NaiveDateTime> {
        match NaiveDateTime::parse_from_str(text, &self.format) {
            Ok(parsed) => Ok(parsed),
            Err(err) if err.kind() == ParseErrorKind::NotEnough => {
                NaiveDate::parse_from_str(text, &self.format)
                    .map(|date| date.and_time(chrono::NaiveTime::MIN))
                    .map_err(|_| self.parse_error(text, err))
            }
            Err(err) => Err(self.parse_error(text, err)),
        }
    }

    fn parse_error(&self, text: &str, source: chrono::ParseError) -> Arc<StrataError> {
        Arc::new(StrataError::Timestamp {
            value: text.to_owned(),
            format: self.format.to_string(),
            source: Some(source),
        })
    }

    /// Replace every [`Scalar::Timestamp`] inside `value` with its tagged
    /// mapping.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Timestamp`] if the format string is invalid.
    pub fn encode(&self, value: Value) -> StrataResult<Value> {
        match value {
            Value::Scalar(Scalar::Timestamp(ts)) => {
                let mut tagged = Mapping::with_capacity(2);
                tagged.insert(TIMESTAMP_MARKER.to_owned(), Value::from(true));
                tagged.insert(
                    TIMESTAMP_PAYLOAD.to_owned(),
                    Value::from(self.format_timestamp(&ts)?),
                );
                Ok(Value::Mapping(tagged))
            }
            Value::Scalar(scalar) => Ok(Value::Scalar(scalar)),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.encode(item))
                .collect::<StrataResult<Vec<_>>>()
                .map(Value::Sequence),
            Value::Mapping(map) => map
                .into_iter()
                .map(|(key, item)| Ok((key, self.encode(item)?)))
                .collect::<StrataResult<Mapping>>()
                .map(Value::Mapping),
        }
    }

    /// Replace every mapping carrying [`TIMESTAMP_MARKER`] with the
    /// timestamp parsed from its [`TIMESTAMP_PAYLOAD`].
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Timestamp`] when a payload is missing, is not
    /// a string, or does not match the format.
    pub fn decode(&self, value: Value) -> StrataResult<Value> {
        match value {
            Value::Mapping(map) if map.contains_key(TIMESTAMP_MARKER) => {
                let payload = map.get(TIMESTAMP_PAYLOAD);
                let Some(Value::Scalar(Scalar::String(text))) = payload else {
                    return Err(Arc::new(StrataError::Timestamp {
                        value: payload.map_or("<missing>", Value::type_name).to_owned(),
                        format: self.format.to_string(),
                        source: None,
                    }));
                };
                self.parse_timestamp(text).map(Value::from)
            }
            Value::Mapping(map) => map
                .into_iter()
                .map(|(key, item)| Ok((key, self.decode(item)?)))
                .collect::<StrataResult<Mapping>>()
                .map(Value::Mapping),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.decode(item))
                .collect::<StrataResult<Vec<_>>>()
                .map(Value::Sequence),
            scalar @ Value::Scalar(_) => Ok(scalar),
        }
    }
}

pub(super) fn parse_timestamp_lenient(text: &str) -> Option<NaiveDateTime> {
    LENIENT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

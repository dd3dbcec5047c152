//! YAML parsing backed by `serde-saphyr`.

use std::path::Path;

use serde::de::{Deserialize, DeserializeSeed, Deserializer};
use serde_saphyr::Options;

use crate::StrataResult;
use crate::value::{Value, ValueSeed};

use super::error::file_error;

/// Document root read with YAML null resolution at every node.
struct YamlDocument(Value);

impl<'de> Deserialize<'de> for YamlDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed::option_nulls().deserialize(deserializer).map(Self)
    }
}

/// Parse YAML contents using strict boolean semantics, so `yes` and `on`
/// stay strings. Plain `~`, `null` and empty scalars become [`Value::NULL`]
/// while quoted forms stay strings. Blank documents parse as `null`.
pub(super) fn parse(origin: &Path, contents: &str) -> StrataResult<Value> {
    if contents.trim().is_empty() {
        return Ok(Value::NULL);
    }
    serde_saphyr::from_str_with_options::<YamlDocument>(
        contents,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
    .map(|YamlDocument(value)| value)
    .map_err(|err| file_error(origin, err))
}

//! TOML parsing. Dates and times become strings in RFC 3339 form.

use std::path::Path;

use crate::StrataResult;
use crate::value::{Mapping, Scalar, Value};

use super::error::file_error;

pub(super) fn parse(origin: &Path, contents: &str) -> StrataResult<Value> {
    let table: toml::Table = toml::from_str(contents).map_err(|e| file_error(origin, e))?;
    Ok(Value::Mapping(convert_table(table)))
}

fn convert_table(table: toml::Table) -> Mapping {
    table
        .into_iter()
        .map(|(key, item)| (key, convert(item)))
        .collect()
}

fn convert(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::from(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::from(f),
        toml::Value::Boolean(b) => Value::from(b),
        toml::Value::Datetime(dt) => Value::Scalar(Scalar::String(dt.to_string())),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(convert).collect()),
        toml::Value::Table(table) => Value::Mapping(convert_table(table)),
    }
}

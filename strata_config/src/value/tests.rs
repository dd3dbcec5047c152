//! Unit tests for the snapshot value model.

use anyhow::{Result, ensure};
use rstest::rstest;
use serde_json::json;

use super::{Mapping, Scalar, ScalarKind, Value, mapping_from_json};

#[rstest]
#[case::small(7, Scalar::Integer(7))]
#[case::max_signed(i64::MAX as u64, Scalar::Integer(i64::MAX))]
#[case::above_signed(u64::MAX, Scalar::Unsigned(u64::MAX))]
fn unsigned_values_stay_signed_when_they_fit(#[case] input: u64, #[case] expected: Scalar) {
    assert_eq!(Scalar::from_u64(input), expected);
}

#[rstest]
fn json_conversion_keeps_shape() -> Result<()> {
    let value = Value::from(json!({"a": [1, "two", null, 2.5], "b": {"c": true}}));
    let Value::Mapping(map) = value else {
        anyhow::bail!("expected a mapping");
    };
    let seq = map
        .get("a")
        .and_then(Value::as_sequence)
        .ok_or_else(|| anyhow::anyhow!("missing sequence"))?;
    ensure!(seq.len() == 4, "sequence length changed");
    ensure!(seq.get(2).is_some_and(Value::is_null), "null element lost");
    ensure!(
        seq.get(3) == Some(&Value::Scalar(Scalar::Float(2.5))),
        "float element lost"
    );
    ensure!(
        map.get("b").and_then(Value::as_mapping).is_some(),
        "nested mapping lost"
    );
    Ok(())
}

#[rstest]
fn json_values_deserialise_in_document_order() -> Result<()> {
    let value: Value = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#)?;
    let keys: Vec<&str> = value
        .as_mapping()
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default();
    ensure!(keys == ["zeta", "alpha", "mid"], "keys reordered: {keys:?}");
    Ok(())
}

#[rstest]
fn values_serialise_back_to_json() -> Result<()> {
    let mut map = Mapping::new();
    map.insert("port".to_owned(), Value::from(8080));
    map.insert("hosts".to_owned(), Value::from(vec![Value::from("a")]));
    let text = serde_json::to_string(&Value::Mapping(map))?;
    ensure!(text == r#"{"port":8080,"hosts":["a"]}"#, "unexpected JSON: {text}");
    Ok(())
}

#[rstest]
fn mapping_from_json_rejects_non_objects() {
    assert!(mapping_from_json(json!([1, 2])).is_none());
    assert!(mapping_from_json(json!({})).is_some_and(|map| map.is_empty()));
}

#[rstest]
#[case(Value::NULL, "null")]
#[case(Value::from(1), "integer")]
#[case(Value::Sequence(Vec::new()), "sequence")]
#[case(Value::Mapping(Mapping::new()), "mapping")]
fn type_names_describe_shape(#[case] value: Value, #[case] expected: &str) {
    assert_eq!(value.type_name(), expected);
}

#[rstest]
fn unsigned_scalars_report_integer_kind() {
    assert_eq!(Scalar::Unsigned(u64::MAX).kind(), ScalarKind::Integer);
}

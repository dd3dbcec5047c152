//! Unit tests for the record codec, timestamp hook and envelope.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, anyhow, ensure};
use chrono::{NaiveDate, NaiveDateTime};
use rstest::{fixture, rstest};
use serde_json::json;

use super::{
    Blob, Descriptor, TimestampHook, decode_value, deserialize, deserialize_with, encode_value,
    from_record, serialize, serialize_with, to_record,
};
use crate::value::{Mapping, Scalar, ScalarKind, Value, mapping_from_json};
use crate::{Record, StrataError};

#[derive(Clone, Debug, PartialEq, Record)]
struct Replica {
    host: String,
    #[record(rename = "portNumber")]
    port: u16,
}

#[derive(Clone, Debug, PartialEq, Record)]
#[record(rename_all = "camelCase")]
struct Cluster {
    cluster_name: String,
    replicas: Vec<Replica>,
    labels: BTreeMap<String, String>,
    weights: Box<[f64]>,
    owner: Option<String>,
    #[record(default)]
    retry_limit: u32,
    extra: Value,
}

#[derive(Clone, Debug, PartialEq, Record)]
struct Stamped {
    id: u64,
    at: NaiveDateTime,
    payload: Blob,
}

fn data(value: serde_json::Value) -> Mapping {
    mapping_from_json(value).unwrap_or_default()
}

#[fixture]
fn cluster_data() -> Mapping {
    data(json!({
        "clusterName": "east",
        "replicas": [
            {"host": "a", "portNumber": 1, "unused": true},
            {"host": "b", "portNumber": 2},
        ],
        "labels": {"tier": "gold"},
        "weights": [0.5, 1],
        "extra": {"anything": [1, 2]},
        "ignored": "yes",
    }))
}

fn timestamp() -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|date| date.and_hms_micro_opt(13, 45, 7, 123_456))
        .ok_or_else(|| anyhow!("invalid test timestamp"))
}

#[rstest]
fn to_record_builds_nested_records(cluster_data: Mapping) -> Result<()> {
    let cluster: Cluster = to_record(cluster_data).map_err(|err| anyhow!("{err}"))?;
    ensure!(cluster.cluster_name == "east", "renamed field not read");
    ensure!(
        cluster.replicas
            == vec![
                Replica {
                    host: "a".into(),
                    port: 1
                },
                Replica {
                    host: "b".into(),
                    port: 2
                },
            ],
        "replicas mismatch: {:?}",
        cluster.replicas
    );
    ensure!(cluster.weights.as_ref() == [0.5, 1.0], "integers widen to floats");
    ensure!(cluster.owner.is_none(), "absent optional must be None");
    ensure!(cluster.retry_limit == 0, "default field must use Default");
    ensure!(
        cluster.extra == Value::from(json!({"anything": [1, 2]})),
        "any-typed field must pass through"
    );
    Ok(())
}

#[rstest]
fn from_record_uses_external_names(cluster_data: Mapping) -> Result<()> {
    let cluster: Cluster = to_record(cluster_data).map_err(|err| anyhow!("{err}"))?;
    let flat = from_record(&cluster);
    let keys: Vec<&str> = flat.keys().map(String::as_str).collect();
    ensure!(
        keys == [
            "clusterName",
            "replicas",
            "labels",
            "weights",
            "owner",
            "retryLimit",
            "extra"
        ],
        "unexpected keys: {keys:?}"
    );
    let first_port = flat
        .get("replicas")
        .and_then(Value::as_sequence)
        .and_then(|items| items.first())
        .and_then(Value::as_mapping)
        .and_then(|replica| replica.get("portNumber"));
    ensure!(first_port == Some(&Value::from(1)), "nested rename lost");
    Ok(())
}

#[rstest]
fn records_round_trip_through_their_flattened_form(cluster_data: Mapping) -> Result<()> {
    let cluster: Cluster = to_record(cluster_data).map_err(|err| anyhow!("{err}"))?;
    let again: Cluster = to_record(from_record(&cluster)).map_err(|err| anyhow!("{err}"))?;
    ensure!(again == cluster, "round trip changed the record");
    Ok(())
}

#[rstest]
#[case::scalar_for_record(
    json!({"clusterName": "x", "replicas": [7], "labels": {}, "weights": [], "extra": null}),
    "$.replicas[0]",
    "record Replica"
)]
#[case::string_for_integer(
    json!({"clusterName": "x", "replicas": [{"host": "a", "portNumber": "80"}], "labels": {}, "weights": [], "extra": null}),
    "$.replicas[0].portNumber",
    "integer"
)]
#[case::mapping_for_sequence(
    json!({"clusterName": "x", "replicas": {}, "labels": {}, "weights": [], "extra": null}),
    "$.replicas",
    "sequence<record Replica>"
)]
#[case::out_of_range(
    json!({"clusterName": "x", "replicas": [{"host": "a", "portNumber": 70000}], "labels": {}, "weights": [], "extra": null}),
    "$.replicas[0].portNumber",
    "u16"
)]
fn shape_errors_name_the_offending_location(
    #[case] input: serde_json::Value,
    #[case] expected_path: &str,
    #[case] expected_type: &str,
) -> Result<()> {
    let err = to_record::<Cluster>(data(input))
        .err()
        .ok_or_else(|| anyhow!("conversion should fail"))?;
    match &*err {
        StrataError::CodecMismatch { path, expected, .. } => {
            ensure!(path == expected_path, "path was {path}");
            ensure!(expected == expected_type, "expected was {expected}");
        }
        other => return Err(anyhow!("unexpected error: {other}")),
    }
    Ok(())
}

#[rstest]
fn missing_required_fields_are_reported() -> Result<()> {
    let err = to_record::<Replica>(data(json!({"host": "a"})))
        .err()
        .ok_or_else(|| anyhow!("conversion should fail"))?;
    ensure!(
        matches!(
            &*err,
            StrataError::MissingField {
                record: "Replica",
                field: "port",
                ..
            }
        ),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn null_fills_optional_fields() -> Result<()> {
    let cluster: Cluster = to_record(data(json!({
        "clusterName": "x",
        "replicas": [],
        "labels": {},
        "weights": [],
        "owner": null,
        "extra": null,
    })))
    .map_err(|err| anyhow!("{err}"))?;
    ensure!(cluster.owner.is_none(), "null optional must be None");
    Ok(())
}

#[rstest]
fn containers_convert_at_the_top_level() -> Result<()> {
    let numbers: Vec<i32> = to_record(Value::from(json!([1, 2, 3]))).map_err(|err| anyhow!("{err}"))?;
    ensure!(numbers == [1, 2, 3], "sequence conversion failed");
    let map: HashMap<String, bool> =
        to_record(Value::from(json!({"a": true}))).map_err(|err| anyhow!("{err}"))?;
    ensure!(map.get("a") == Some(&true), "mapping conversion failed");
    let nothing: Option<u8> = to_record(Value::NULL).map_err(|err| anyhow!("{err}"))?;
    ensure!(nothing.is_none(), "null should convert to None");
    Ok(())
}

#[rstest]
fn descriptors_are_cached_per_type() {
    let first = <Replica as super::Record>::record_descriptor();
    let second = <Replica as super::Record>::record_descriptor();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(
        first.field_by_external("portNumber").map(super::FieldDescriptor::name),
        Some("port")
    );
}

#[rstest]
fn descriptors_render_readably() {
    let descriptor = <Option<Vec<BTreeMap<String, u8>>> as super::Shape>::descriptor();
    assert_eq!(
        descriptor.to_string(),
        "optional<sequence<mapping<string, integer>>>"
    );
    assert_eq!(
        <Blob as super::Shape>::descriptor(),
        Descriptor::Scalar(ScalarKind::Bytes)
    );
}

#[rstest]
fn required_flags_follow_field_types() {
    let descriptor = <Cluster as super::Record>::record_descriptor();
    let required: Vec<_> = descriptor
        .fields()
        .iter()
        .map(|field| (field.name(), field.is_required()))
        .collect();
    assert_eq!(
        required,
        [
            ("cluster_name", true),
            ("replicas", true),
            ("labels", true),
            ("weights", true),
            ("owner", false),
            ("retry_limit", false),
            ("extra", true),
        ]
    );
}

#[rstest]
fn timestamp_hook_tags_and_restores() -> Result<()> {
    let at = timestamp()?;
    let hook = TimestampHook::default();
    let tagged = hook.encode(Value::from(at)).map_err(|err| anyhow!("{err}"))?;
    ensure!(
        tagged == Value::from(json!({"__datetime__": true, "as_str": "2024-02-29 13:45:07.123456"})),
        "unexpected tagged form: {tagged:?}"
    );
    let restored = hook.decode(tagged).map_err(|err| anyhow!("{err}"))?;
    ensure!(restored == Value::from(at), "timestamp not restored");
    Ok(())
}

#[rstest]
#[case::nanoseconds(123_456_789, "2024-02-29 13:45:07.123456789")]
#[case::milliseconds(250_000_000, "2024-02-29 13:45:07.250")]
#[case::whole_seconds(0, "2024-02-29 13:45:07")]
fn default_hook_keeps_sub_second_precision(
    #[case] nanos: u32,
    #[case] expected: &str,
) -> Result<()> {
    let at = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|date| date.and_hms_nano_opt(13, 45, 7, nanos))
        .ok_or_else(|| anyhow!("invalid test timestamp"))?;
    let hook = TimestampHook::default();
    let text = hook.format_timestamp(&at).map_err(|err| anyhow!("{err}"))?;
    ensure!(text == expected, "unexpected rendering {text}");
    let record = Stamped {
        id: 7,
        at,
        payload: Blob::default(),
    };
    let bytes = serialize(&record).map_err(|err| anyhow!("{err}"))?;
    let decoded: Stamped = deserialize(&bytes).map_err(|err| anyhow!("{err}"))?;
    ensure!(decoded == record, "envelope lost precision: {}", decoded.at);
    Ok(())
}

#[rstest]
fn default_hook_reads_six_digit_payloads() -> Result<()> {
    let restored = TimestampHook::default()
        .decode(Value::from(
            json!({"__datetime__": true, "as_str": "2024-02-29 13:45:07.000000"}),
        ))
        .map_err(|err| anyhow!("{err}"))?;
    let expected = NaiveDate::from_ymd_opt(2024, 2, 29)
        .and_then(|date| date.and_hms_opt(13, 45, 7))
        .ok_or_else(|| anyhow!("invalid test timestamp"))?;
    ensure!(restored == Value::from(expected), "unexpected {restored:?}");
    Ok(())
}

#[rstest]
fn timestamp_hook_reports_format_mismatch() -> Result<()> {
    let at = timestamp()?;
    let tagged = TimestampHook::with_format("%d/%m/%Y %H:%M")
        .encode(Value::from(at))
        .map_err(|err| anyhow!("{err}"))?;
    let err = TimestampHook::default()
        .decode(tagged)
        .err()
        .ok_or_else(|| anyhow!("decode should fail"))?;
    ensure!(
        matches!(&*err, StrataError::Timestamp { value, .. } if value == "29/02/2024 13:45"),
        "unexpected error: {err}"
    );
    Ok(())
}

#[rstest]
fn date_only_formats_decode_to_midnight() -> Result<()> {
    let hook = TimestampHook::with_format("%Y-%m-%d");
    let parsed = hook
        .parse_timestamp("2024-02-29")
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(
        parsed.to_string() == "2024-02-29 00:00:00",
        "unexpected timestamp {parsed}"
    );
    Ok(())
}

#[rstest]
fn envelope_round_trips_records() -> Result<()> {
    let record = Stamped {
        id: u64::MAX,
        at: timestamp()?,
        payload: Blob(vec![0, 159, 255]),
    };
    let bytes = serialize(&record).map_err(|err| anyhow!("{err}"))?;
    let decoded: Stamped = deserialize(&bytes).map_err(|err| anyhow!("{err}"))?;
    ensure!(decoded == record, "envelope changed the record");
    Ok(())
}

#[rstest]
fn envelope_honours_custom_hooks() -> Result<()> {
    let hook = TimestampHook::with_format("%d.%m.%Y %H:%M:%S%.6f");
    let record = Stamped {
        id: 1,
        at: timestamp()?,
        payload: Blob::default(),
    };
    let bytes = serialize_with(&record, &hook).map_err(|err| anyhow!("{err}"))?;
    let decoded: Stamped = deserialize_with(&bytes, &hook).map_err(|err| anyhow!("{err}"))?;
    ensure!(decoded == record, "custom hook round trip failed");
    ensure!(
        deserialize::<Stamped>(&bytes).is_err(),
        "default hook must reject a foreign format"
    );
    Ok(())
}

#[rstest]
fn untyped_envelope_keeps_blobs_and_order() -> Result<()> {
    let mut map = Mapping::new();
    map.insert("z".into(), Value::Scalar(Scalar::Bytes(vec![1, 2])));
    map.insert("a".into(), Value::from("text"));
    let value = Value::Mapping(map);
    let hook = TimestampHook::default();
    let bytes = encode_value(&value, &hook).map_err(|err| anyhow!("{err}"))?;
    let decoded = decode_value(&bytes, &hook).map_err(|err| anyhow!("{err}"))?;
    ensure!(decoded == value, "untyped round trip changed the value");
    Ok(())
}

#[rstest]
fn malformed_envelopes_are_rejected() {
    let err = deserialize::<Replica>(&[0xc1]).err();
    assert!(matches!(err.as_deref(), Some(StrataError::Envelope { .. })));
}

//! Merge engine combining an existing view with new data.

use indexmap::IndexMap;

use super::{Layer, Node};
use crate::value::{Mapping, Value};

/// Combine `origin` with `patch`, returning a new view.
///
/// Behaviour:
/// - `partial == false`: the result is `Layer::wrap(patch)`; `origin` is
///   ignored.
/// - `partial == true`: mappings merge recursively. For every key in
///   `patch`, if both sides hold a mapping the two are merged; otherwise the
///   patch value replaces the existing node wholesale. Keys only present in
///   `origin` keep their value and position; new keys are appended in patch
///   order.
///
/// Sequences are never merged element-wise: a sequence in `patch` always
/// replaces the existing node. This is expected behaviour, so callers that
/// keep list-shaped sections must send the whole list.
///
/// `origin` is never modified and untouched subtrees are shared with the
/// result.
///
/// # Examples
///
/// ```rust
/// use strata_config::{Layer, merge, value::mapping_from_json};
/// use serde_json::json;
///
/// let origin = Layer::wrap(mapping_from_json(json!({"a": 1, "b": {"x": 1}})).expect("object"));
/// let patch = mapping_from_json(json!({"b": {"y": 2}, "c": 3})).expect("object");
/// let merged = merge(&origin, patch, true);
/// assert_eq!(
///     merged.flatten(),
///     mapping_from_json(json!({"a": 1, "b": {"x": 1, "y": 2}, "c": 3})).expect("object"),
/// );
/// assert!(!origin.contains("c"));
/// ```
#[must_use]
pub fn merge(origin: &Layer, patch: Mapping, partial: bool) -> Layer {
    if !partial {
        return Layer::wrap(patch);
    }
    let mut table = origin.table().clone();
    merge_table(&mut table, patch);
    Layer::from(table)
}

/// Overlay `patch` onto `table`. `table` is a private copy of the origin's
/// key table, so nested layers are replaced rather than mutated. Existing keys
/// keep their position.
fn merge_table(table: &mut IndexMap<String, Node>, patch: Mapping) {
    for (key, value) in patch {
        let node = match (table.get(&key), value) {
            (Some(Node::Layer(existing)), Value::Mapping(nested)) => {
                Node::Layer(merge(existing, nested, true))
            }
            (_, replacement) => Node::wrap(replacement),
        };
        table.insert(key, node);
    }
}

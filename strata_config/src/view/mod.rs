//! Immutable, path-addressable views over configuration snapshots.
//!
//! A [`Layer`] wraps one snapshot mapping. Every nested mapping is itself a
//! `Layer`, sequences keep their order and wrap any mapping elements, and
//! scalars are stored as-is. Layers are never mutated: [`merge`] returns a new
//! layer that shares untouched subtrees with its origin, so a reader holding
//! an older layer always sees a complete snapshot.
//!
//! ```rust
//! use strata_config::{Layer, value::mapping_from_json};
//! use serde_json::json;
//!
//! let data = mapping_from_json(json!({"service": {"port": 8080}})).expect("object");
//! let view = Layer::wrap(data.clone());
//! assert_eq!(view.read(["service", "port"]).and_then(|n| n.as_i64()), Some(8080));
//! assert_eq!(view.flatten(), data);
//! ```

mod key;
mod merge;
mod node;
mod read;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::{Mapping, Value};

pub use key::Key;
pub use merge::merge;
pub use node::Node;
pub use read::{ReadOptions, Reader, read};

/// Immutable view over one snapshot mapping.
///
/// Cloning is cheap: the ordered key table is reference counted. Equality and
/// the `Debug` representation are those of the flattened mapping.
#[derive(Clone, Default)]
pub struct Layer {
    table: Arc<IndexMap<String, Node>>,
}

impl Layer {
    /// An empty view.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a plain mapping, recursively wrapping nested mappings and the
    /// mapping elements of nested sequences.
    #[must_use]
    pub fn wrap(data: Mapping) -> Self {
        data.into_iter()
            .map(|(key, value)| (key, Node::wrap(value)))
            .collect::<IndexMap<_, _>>()
            .into()
    }

    /// Convert the view back into its plain nested form.
    ///
    /// `Layer::wrap(x).flatten() == x` for every mapping `x`.
    #[must_use]
    pub fn flatten(&self) -> Mapping {
        self.table
            .iter()
            .map(|(key, node)| (key.clone(), node.to_value()))
            .collect()
    }

    /// Look up a direct child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.table.get(key)
    }

    /// Returns `true` if the view has a direct child named `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Iterate over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// Iterate over the direct children in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.table.values()
    }

    /// Iterate over `(key, child)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.table.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when the view has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Read a path with the default [`ReadOptions`].
    pub fn read<I>(&self, path: I) -> Option<Node>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        read(self, path, &ReadOptions::default())
    }

    /// Read a path with explicit options.
    pub fn read_with<I>(&self, path: I, options: &ReadOptions) -> Option<Node>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        read(self, path, options)
    }

    /// Bind this view and `options` into a reusable [`Reader`].
    #[must_use]
    pub fn reader(&self, options: ReadOptions) -> Reader {
        Reader::new(self.clone(), options)
    }

    /// Returns `true` if both handles point at the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }

    pub(crate) fn table(&self) -> &IndexMap<String, Node> {
        &self.table
    }
}

impl From<IndexMap<String, Node>> for Layer {
    fn from(table: IndexMap<String, Node>) -> Self {
        Self {
            table: Arc::new(table),
        }
    }
}

impl From<Mapping> for Layer {
    fn from(data: Mapping) -> Self {
        Self::wrap(data)
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.table == other.table
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.flatten(), f)
    }
}

impl From<Layer> for Value {
    fn from(layer: Layer) -> Self {
        Self::Mapping(layer.flatten())
    }
}

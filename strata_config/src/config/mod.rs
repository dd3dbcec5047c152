//! The configuration cell: one atomically swappable view per config.
//!
//! Readers load the current [`Layer`] without locking and keep a consistent
//! snapshot for as long as they hold it. Writers compute a new layer with
//! [`merge`] and publish it with a read-copy-update loop, so concurrent
//! writers never lose an update.
//!
//! ```rust
//! use strata_config::{Config, value::mapping_from_json};
//! use serde_json::json;
//!
//! let config = Config::new();
//! config.replace(mapping_from_json(json!({"db": {"host": "a", "port": 1}})).expect("object"));
//! config.update(mapping_from_json(json!({"db": {"port": 2}})).expect("object"), true);
//!
//! assert_eq!(config.read(["db", "host"]).as_ref().and_then(|n| n.as_str()), Some("a"));
//! assert_eq!(config.read(["db", "port"]).and_then(|n| n.as_i64()), Some(2));
//! ```


use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::codec::{Shape, to_record};
use crate::registry::DEFAULT_NAME;
use crate::value::Mapping;
use crate::view::{Key, Layer, Node, ReadOptions, merge, read};
use crate::StrataResult;

/// A named, live-updatable configuration.
pub struct Config {
    name: String,
    current: ArcSwapOption<Layer>,
}

impl Default for Config {
    fn default() -> Self {
        Self::named(DEFAULT_NAME)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("name", &self.name)
            .field("view", &self.get_view())
            .finish()
    }
}

impl Config {
    /// An empty config named [`DEFAULT_NAME`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty config with the given name. The name appears in log fields
    /// and producer errors.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: ArcSwapOption::empty(),
        }
    }

    /// A config already holding `view`.
    #[must_use]
    pub fn with_view(view: Layer) -> Self {
        let config = Self::new();
        config.current.store(Some(Arc::new(view)));
        config
    }

    /// Name of this config.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The latest published snapshot, or `None` before the first load.
    #[must_use]
    pub fn get_view(&self) -> Option<Layer> {
        self.current.load_full().map(|view| Layer::clone(&view))
    }

    /// Returns `true` once a snapshot has been published.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Read `path` from the current snapshot with default [`ReadOptions`].
    pub fn read<I>(&self, path: I) -> Option<Node>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        self.read_with(path, &ReadOptions::default())
    }

    /// Read `path` from the current snapshot. An unloaded config reads like
    /// an empty view.
    pub fn read_with<I>(&self, path: I, options: &ReadOptions) -> Option<Node>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let guard = self.current.load();
        match guard.as_deref() {
            Some(view) => read(view, path, options),
            None => read(&Layer::empty(), path, options),
        }
    }

    /// Read `path` and convert the node with the record codec.
    ///
    /// A path miss yields `Ok(None)`; the fallback of shallow search does not
    /// apply here.
    ///
    /// # Errors
    ///
    /// Returns the codec's errors when the node does not fit `T`.
    pub fn read_as<T, I>(&self, path: I) -> StrataResult<Option<T>>
    where
        T: Shape,
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let strict = ReadOptions::new().shallow_search(false);
        self.read_with(path, &strict)
            .map(|node| to_record(node.to_value()))
            .transpose()
    }

    /// Publish a new snapshot built from `data`.
    ///
    /// With `partial` the data is deep-merged into the current snapshot (or
    /// an empty one); otherwise it replaces the snapshot outright.
    pub fn update(&self, data: Mapping, partial: bool) {
        if partial {
            self.current.rcu(|current| {
                let origin = current.as_deref().cloned().unwrap_or_default();
                Some(Arc::new(merge(&origin, data.clone(), true)))
            });
        } else {
            self.current.store(Some(Arc::new(Layer::wrap(data))));
        }
        tracing::debug!(config = %self.name, partial, "configuration updated");
    }

    /// Replace the snapshot with `data`.
    pub fn replace(&self, data: Mapping) {
        self.update(data, false);
    }
}

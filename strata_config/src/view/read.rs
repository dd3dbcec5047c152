//! Path reads that tolerate partially absent structure.
//!
//! A read never fails for missing data. When a segment cannot be resolved
//! (absent key, out-of-range index, or a scalar reached before the path
//! ends) the outcome depends on [`ReadOptions::shallow_search`]: when set,
//! the configured fallback is returned; otherwise the read yields `None`.

use super::{Key, Layer, Node};

/// Options controlling how path misses resolve.
#[derive(Clone, Debug)]
pub struct ReadOptions {
    shallow_search: bool,
    fallback: Option<Node>,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            shallow_search: true,
            fallback: None,
        }
    }
}

impl ReadOptions {
    /// Options with `shallow_search` enabled and no fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true` (the default) a miss returns the fallback; when `false` a
    /// miss returns `None` regardless of the fallback.
    #[must_use]
    pub const fn shallow_search(mut self, enabled: bool) -> Self {
        self.shallow_search = enabled;
        self
    }

    /// Value returned on a miss while `shallow_search` is enabled.
    #[must_use]
    pub fn with_default(mut self, fallback: impl Into<Node>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    /// Returns whether shallow search is enabled.
    #[must_use]
    pub const fn is_shallow_search(&self) -> bool {
        self.shallow_search
    }

    /// Returns the configured fallback.
    #[must_use]
    pub const fn fallback(&self) -> Option<&Node> {
        self.fallback.as_ref()
    }

    fn miss(&self, key: &Key) -> Option<Node> {
        tracing::trace!(%key, shallow_search = self.shallow_search, "path miss");
        if self.shallow_search {
            self.fallback.clone()
        } else {
            None
        }
    }
}

/// Traverse `path` starting at `view`.
///
/// An empty path returns the view itself as [`Node::Layer`].
///
/// ```rust
/// use strata_config::{Layer, Node, ReadOptions, read, value::mapping_from_json};
/// use serde_json::json;
///
/// let view = Layer::wrap(mapping_from_json(json!({"a": {"b": 1}})).expect("object"));
/// let lenient = ReadOptions::new().with_default(99);
/// assert_eq!(read(&view, ["a", "c"], &lenient), Some(Node::from(99)));
///
/// let strict = lenient.shallow_search(false);
/// assert_eq!(read(&view, ["a", "c"], &strict), None);
/// ```
pub fn read<I>(view: &Layer, path: I, options: &ReadOptions) -> Option<Node>
where
    I: IntoIterator,
    I::Item: Into<Key>,
{
    let mut keys = path.into_iter().map(Into::into);
    let Some(first) = keys.next() else {
        return Some(Node::Layer(view.clone()));
    };
    let Key::Name(name) = &first else {
        return options.miss(&first);
    };
    let Some(mut current) = view.get(name) else {
        return options.miss(&first);
    };
    for key in keys {
        match current.child(&key) {
            Some(next) => current = next,
            None => return options.miss(&key),
        }
    }
    Some(current.clone())
}

/// A view bound to read options, reusable for many reads.
///
/// This is the partially-applied form of [`read`]: it keeps the snapshot it
/// was created from, so later reads are unaffected by refreshes.
#[derive(Clone, Debug)]
pub struct Reader {
    view: Layer,
    options: ReadOptions,
}

impl Reader {
    /// Bind `view` and `options`.
    #[must_use]
    pub const fn new(view: Layer, options: ReadOptions) -> Self {
        Self { view, options }
    }

    /// Read `path` from the bound view.
    pub fn read<I>(&self, path: I) -> Option<Node>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        read(&self.view, path, &self.options)
    }

    /// The bound view.
    #[must_use]
    pub const fn view(&self) -> &Layer {
        &self.view
    }

    /// The bound options.
    #[must_use]
    pub const fn options(&self) -> &ReadOptions {
        &self.options
    }
}

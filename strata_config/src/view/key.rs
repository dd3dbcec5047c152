//! Path segments used to address nodes inside a view.

use std::fmt;

/// One segment of a read path.
///
/// Names address layer children; indices address sequence elements.
///
/// ```rust
/// use strata_config::Key;
///
/// let path = [Key::from("servers"), Key::from(0), Key::from("host")];
/// assert_eq!(path[1], Key::Index(0));
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Key {
    /// Mapping key.
    Name(String),
    /// Zero-based sequence index.
    Index(usize),
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Self::Name(name.clone())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&Self> for Key {
    fn from(key: &Self) -> Self {
        key.clone()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

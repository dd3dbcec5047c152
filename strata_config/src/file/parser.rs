//! Format-specific parsing utilities for configuration files.

use std::fmt;
use std::path::Path;

use crate::value::{Mapping, Scalar, Value};
use crate::{StrataError, StrataResult};

use super::error::{file_error, invalid_data};

/// Document formats understood by the loader.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Format {
    /// `.json`
    Json,
    /// `.yaml` and `.yml`; requires the `yaml` feature.
    Yaml,
    /// `.toml`; requires the `toml` feature.
    Toml,
}

impl Format {
    /// Select a format from the file extension, ignoring case.
    ///
    /// Formats whose cargo feature is disabled are treated as unsupported.
    ///
    /// ```rust
    /// use std::path::Path;
    /// use strata_config::file::Format;
    ///
    /// assert_eq!(Format::from_path(Path::new("app.YML")).ok(), Some(Format::Yaml));
    /// assert!(Format::from_path(Path::new("app.ini")).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::UnsupportedFormat`] for any other extension,
    /// including a missing one.
    pub fn from_path(path: &Path) -> StrataResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            #[cfg(feature = "yaml")]
            Some("yaml" | "yml") => Ok(Self::Yaml),
            #[cfg(feature = "toml")]
            Some("toml") => Ok(Self::Toml),
            _ => Err(StrataError::unsupported_format(path)),
        }
    }

    /// Lower-case name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse an in-memory document whose root must be a mapping.
///
/// `origin` names the document in errors; it is usually the file path.
/// A `null` root (including an empty YAML document) yields an empty mapping.
///
/// # Errors
///
/// Returns [`StrataError::File`] when the contents fail to parse, when the
/// root is not a mapping, or when the format's feature is disabled.
pub fn parse_mapping(format: Format, origin: &Path, contents: &str) -> StrataResult<Mapping> {
    let root = parse_value(format, origin, contents)?;
    match root {
        Value::Mapping(map) => Ok(map),
        Value::Scalar(Scalar::Null) => {
            tracing::debug!(path = %origin.display(), "empty document");
            Ok(Mapping::new())
        }
        other => Err(invalid_data(
            origin,
            format!(
                "configuration root must be a mapping, found {}",
                other.type_name()
            ),
        )),
    }
}

fn parse_value(format: Format, origin: &Path, contents: &str) -> StrataResult<Value> {
    match format {
        Format::Json => serde_json::from_str(contents).map_err(|e| file_error(origin, e)),
        Format::Yaml => {
            #[cfg(feature = "yaml")]
            {
                super::yaml::parse(origin, contents)
            }
            #[cfg(not(feature = "yaml"))]
            {
                Err(disabled(origin, "yaml"))
            }
        }
        Format::Toml => {
            #[cfg(feature = "toml")]
            {
                super::toml_value::parse(origin, contents)
            }
            #[cfg(not(feature = "toml"))]
            {
                Err(disabled(origin, "toml"))
            }
        }
    }
}

#[cfg(any(not(feature = "yaml"), not(feature = "toml")))]
fn disabled(origin: &Path, feature: &str) -> std::sync::Arc<StrataError> {
    file_error(
        origin,
        std::io::Error::other(format!(
            "{feature} feature disabled: enable the '{feature}' feature to support this file format"
        )),
    )
}

//! Runtime loading entrypoint for configuration files.

use std::path::Path;

use crate::StrataResult;
use crate::value::Mapping;

use super::error::file_error;
use super::parser::{Format, parse_mapping};

/// Load a configuration file into a mapping, selecting the parser from the
/// extension (`json`, `yaml`, `yml`, `toml`; case-insensitive).
///
/// The extension is checked before the file is opened, so an unsupported
/// format is reported even when the file does not exist. Files are read as
/// UTF-8.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use strata_config::file::load_mapping;
///
/// # fn run() -> strata_config::StrataResult<()> {
/// let data = load_mapping(Path::new("config.yaml"))?;
/// println!("{} top-level keys", data.len());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`crate::StrataError::UnsupportedFormat`] for an unknown
/// extension, or [`crate::StrataError::File`] if reading or parsing fails or
/// the document root is not a mapping.
pub fn load_mapping(path: &Path) -> StrataResult<Mapping> {
    let format = Format::from_path(path)?;
    let data = std::fs::read_to_string(path).map_err(|e| file_error(path, e))?;
    let mapping = parse_mapping(format, path, &data)?;
    tracing::debug!(path = %path.display(), %format, keys = mapping.len(), "loaded configuration file");
    Ok(mapping)
}

//! Helpers for reading configuration files into [`crate::value::Mapping`]s.

mod error;
mod loader;
mod parser;
#[cfg(feature = "toml")]
mod toml_value;
#[cfg(feature = "yaml")]
mod yaml;

pub use loader::load_mapping;
pub use parser::{Format, parse_mapping};

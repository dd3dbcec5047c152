//! Error types produced by the configuration store.

mod constructors;
mod conversions;
mod types;

pub use types::{ProducerError, StrataError};

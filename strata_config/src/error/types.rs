//! Primary error enum for loading, refreshing and converting configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Error returned by a producer function during a refresh.
pub type ProducerError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while loading, refreshing or converting
/// configuration.
///
/// Reading a path that does not exist is never an error; see
/// [`crate::ReadOptions`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StrataError {
    /// No loader is registered for the file's extension.
    #[error("file format '{extension}' is not supported: {path}")]
    UnsupportedFormat {
        /// Path that was requested.
        path: PathBuf,
        /// Extension as written (empty when the path has none).
        extension: String,
    },

    /// Error reading or parsing a configuration file.
    #[error("Configuration file error in '{path}': {source}")]
    File {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying error reported by the reader or parser.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A producer failed during a steady-state refresh. The previous snapshot
    /// was retained.
    #[error("refresh of config '{config}' failed: {source}")]
    Producer {
        /// Name of the config being refreshed.
        config: String,
        /// Error raised by the producer.
        #[source]
        source: ProducerError,
    },

    /// A producer failed during the initial synchronous refresh performed when
    /// a watcher is installed.
    #[error("initial refresh of config '{config}' failed: {source}")]
    ProducerAtSetup {
        /// Name of the config being watched.
        config: String,
        /// Error raised by the producer.
        #[source]
        source: ProducerError,
    },

    /// Data does not have the shape a record descriptor requires.
    #[error("cannot convert value at '{path}': expected {expected}, found {found}")]
    CodecMismatch {
        /// Location of the offending value, for example `$.service.port`.
        path: String,
        /// Description of the declared type.
        expected: String,
        /// Description of the value that was supplied.
        found: String,
    },

    /// A required record field was absent from the data.
    #[error("missing field '{field}' for record '{record}' at '{path}'")]
    MissingField {
        /// Name of the record type.
        record: &'static str,
        /// Internal name of the field.
        field: &'static str,
        /// Location of the record value.
        path: String,
    },

    /// A timestamp could not be formatted or parsed with the configured
    /// format string.
    #[error("timestamp '{value}' does not match format '{format}'")]
    Timestamp {
        /// Text (or description) of the offending timestamp.
        value: String,
        /// Format string in use.
        format: String,
        /// Underlying parse failure, when one was reported.
        #[source]
        source: Option<chrono::ParseError>,
    },

    /// The binary envelope could not be encoded or decoded.
    #[error("binary envelope error: {source}")]
    Envelope {
        /// Underlying MessagePack error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The background watcher thread could not be started.
    #[error("failed to spawn watcher thread: {source}")]
    Spawn {
        /// Error returned by the thread builder.
        #[source]
        source: std::io::Error,
    },
}

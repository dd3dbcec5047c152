//! Constructors for `StrataError` values shared across modules.

use std::path::Path;
use std::sync::Arc;

use super::{ProducerError, StrataError};

impl StrataError {
    /// Construct an [`StrataError::UnsupportedFormat`] for `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_config::StrataError;
    /// use std::path::Path;
    ///
    /// let err = StrataError::unsupported_format(Path::new("settings.ini"));
    /// assert!(err.to_string().contains("'ini'"));
    /// ```
    #[must_use]
    pub fn unsupported_format(path: &Path) -> Arc<Self> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Arc::new(Self::UnsupportedFormat {
            path: path.to_path_buf(),
            extension,
        })
    }

    /// Construct a [`StrataError::CodecMismatch`].
    #[must_use]
    pub fn codec_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self::CodecMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        })
    }

    /// Construct a [`StrataError::Producer`] for a steady-state failure.
    #[must_use]
    pub fn producer(config: &str, source: ProducerError) -> Self {
        Self::Producer {
            config: config.to_owned(),
            source,
        }
    }

    /// Construct a [`StrataError::ProducerAtSetup`] wrapped in an [`Arc`].
    #[must_use]
    pub fn producer_at_setup(config: &str, source: ProducerError) -> Arc<Self> {
        Arc::new(Self::ProducerAtSetup {
            config: config.to_owned(),
            source,
        })
    }

    /// Returns `true` when the error came from a producer, either at setup or
    /// during a steady-state refresh.
    #[must_use]
    pub const fn is_producer_failure(&self) -> bool {
        matches!(self, Self::Producer { .. } | Self::ProducerAtSetup { .. })
    }
}

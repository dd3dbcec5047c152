//! Lifting `rmp-serde` results into `StrataResult`.
//!
//! The envelope calls `rmp_serde::to_vec` and `rmp_serde::from_slice`, whose
//! encode and decode errors convert into [`StrataError::Envelope`].
//! [`StrataResultExt::into_strata`] applies that conversion and wraps the
//! error in an `Arc` in one step.
//!
//! # Examples
//!
//! ```
//! use strata_config::{StrataResult, StrataResultExt};
//!
//! fn encode() -> StrataResult<Vec<u8>> {
//!     rmp_serde::to_vec(&42).into_strata()
//! }
//! # assert!(encode().is_ok());
//! ```

use std::sync::Arc;

use crate::{StrataError, StrataResult};

/// Converts a result whose error has a [`StrataError`] conversion.
pub trait StrataResultExt<T, E> {
    /// Map the error into a shared [`StrataError`].
    ///
    /// # Errors
    ///
    /// Returns the converted error, such as [`StrataError::Envelope`] for
    /// MessagePack failures.
    fn into_strata(self) -> StrataResult<T>;
}

impl<T, E> StrataResultExt<T, E> for Result<T, E>
where
    E: Into<StrataError>,
{
    fn into_strata(self) -> StrataResult<T> {
        self.map_err(|e| Arc::new(e.into()))
    }
}

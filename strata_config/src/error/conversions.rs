//! Trait-based conversions between external error types and `StrataError`.

use super::StrataError;

impl From<rmp_serde::encode::Error> for StrataError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Self::Envelope {
            source: Box::new(e),
        }
    }
}

impl From<rmp_serde::decode::Error> for StrataError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Self::Envelope {
            source: Box::new(e),
        }
    }
}

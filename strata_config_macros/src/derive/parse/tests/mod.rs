//! Unit tests for `#[record(...)]` parsing.

//! Test helpers shared across crates.
//!
//! - [`producer`]: scripted producers for exercising refresh loops;
//! - [`wait`]: polling waits for background effects;
//! - [`files`]: configuration documents in temporary directories.

pub mod files;
pub mod producer;
pub mod wait;

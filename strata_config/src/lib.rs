//! A live-reloading, path-addressable configuration store.
//!
//! Configuration documents are held as immutable [`Layer`] snapshots inside
//! a [`Config`]. Reads walk a path of keys and never fail for missing data.
//! Updates build a new snapshot, deep-merging or replacing, and publish it
//! atomically, so readers always see a complete view. A config can be kept
//! fresh by a producer polled on a thread ([`Config::watch`]) or on a tokio
//! runtime ([`Config::watch_async`]).
//!
//! The [`codec`] module converts untyped data to and from records declared
//! with `#[derive(Record)]`, and wraps them in a MessagePack envelope.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use strata_config::{ConfigRegistry, Record};
//!
//! #[derive(Debug, Record)]
//! struct Database {
//!     host: String,
//!     port: u16,
//! }
//!
//! # fn run() -> strata_config::StrataResult<()> {
//! let registry = ConfigRegistry::new();
//! let config = registry.load(Path::new("config.yaml"), "app")?;
//! let db: Option<Database> = config.read_as(["database"])?;
//! # Ok(())
//! # }
//! ```

extern crate self as strata_config;

use std::sync::Arc;

pub use strata_config_macros::Record;

pub mod codec;
mod config;
mod error;
pub mod file;
pub mod refresh;
mod registry;
mod result_ext;
pub mod value;
mod view;

pub use codec::{Record, Shape};
pub use config::Config;
pub use error::{ProducerError, StrataError};
pub use refresh::{ErrorSink, RefreshStrategy, ThreadedPoller, WatchHandle, WatchOptions};
#[cfg(feature = "async")]
pub use refresh::{ScheduledRefresh, ScheduledWatch};
pub use registry::{ConfigRegistry, DEFAULT_NAME};
pub use result_ext::StrataResultExt;
pub use value::{Mapping, Scalar, Value};
pub use view::{Key, Layer, Node, ReadOptions, Reader, merge, read};

/// Shared result type for fallible operations.
pub type StrataResult<T> = Result<T, Arc<StrataError>>;

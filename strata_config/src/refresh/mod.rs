//! Background refresh of a [`Config`] from a producer function.
//!
//! Two strategies implement [`RefreshStrategy`]:
//!
//! - [`ThreadedPoller`] runs the loop on a dedicated OS thread and is what
//!   [`Config::watch`] uses;
//! - [`ScheduledRefresh`] (feature `async`) runs it as a task on a tokio
//!   runtime and backs [`Config::watch_async`].
//!
//! Both perform one refresh before returning and report its failure to the
//! caller as [`StrataError::ProducerAtSetup`]. Later failures never touch
//! the published view; they go to the configured [`ErrorSink`].

#[cfg(feature = "async")]
mod scheduled;
mod threaded;
#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::value::Mapping;
use crate::{Config, ProducerError, StrataError, StrataResult};

#[cfg(feature = "async")]
pub use scheduled::{ScheduledRefresh, ScheduledWatch, StartFuture};
pub use threaded::{DEFAULT_THREAD_NAME, ThreadedPoller, WatchHandle};

/// Destination for refresh failures after the initial refresh.
#[derive(Clone, Default)]
pub enum ErrorSink {
    /// Log with `tracing::error!` and keep polling.
    #[default]
    Log,
    /// Discard failures.
    Silent,
    /// Pass failures to a callback.
    Custom(Arc<dyn Fn(&StrataError) + Send + Sync>),
}

impl ErrorSink {
    /// Wrap a callback as a sink.
    pub fn custom(callback: impl Fn(&StrataError) + Send + Sync + 'static) -> Self {
        Self::Custom(Arc::new(callback))
    }

    /// Deliver `err` to this sink.
    pub fn report(&self, err: &StrataError) {
        match self {
            Self::Log => tracing::error!(error = %err, "configuration refresh failed"),
            Self::Silent => {}
            Self::Custom(callback) => callback(err),
        }
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Log => f.write_str("Log"),
            Self::Silent => f.write_str("Silent"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options shared by both refresh strategies.
#[derive(Clone, Debug)]
pub struct WatchOptions {
    partial: bool,
    refresh: bool,
    on_error: ErrorSink,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            partial: true,
            refresh: true,
            on_error: ErrorSink::default(),
        }
    }
}

impl WatchOptions {
    /// Partial merges, repeating refresh, failures logged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deep-merge producer output into the current view (`true`, the
    /// default) or replace the view with it (`false`).
    #[must_use]
    pub const fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// When `false`, only the initial refresh runs and no loop is started.
    #[must_use]
    pub const fn refresh(mut self, refresh: bool) -> Self {
        self.refresh = refresh;
        self
    }

    /// Where steady-state failures are reported.
    #[must_use]
    pub fn on_error(mut self, sink: ErrorSink) -> Self {
        self.on_error = sink;
        self
    }

    /// Returns whether updates are partial.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        self.partial
    }

    /// Returns whether a refresh loop is started.
    #[must_use]
    pub const fn is_refresh(&self) -> bool {
        self.refresh
    }

    /// The configured error sink.
    #[must_use]
    pub const fn error_sink(&self) -> &ErrorSink {
        &self.on_error
    }
}

/// A way of keeping a [`Config`] refreshed from a producer `P`.
///
/// `Output` is whatever starting the strategy yields: a result for the
/// threaded poller, a future resolving to one for the scheduled strategy.
pub trait RefreshStrategy<P> {
    /// Value returned by [`RefreshStrategy::start`].
    type Output;

    /// Run the initial refresh and, if enabled, start the loop.
    fn start(
        self,
        config: &Arc<Config>,
        producer: P,
        interval: Duration,
        options: WatchOptions,
    ) -> Self::Output;
}

/// Apply the initial producer outcome, mapping failure to
/// [`StrataError::ProducerAtSetup`].
fn apply_initial(
    config: &Config,
    outcome: Result<Mapping, ProducerError>,
    options: &WatchOptions,
) -> StrataResult<()> {
    let data = outcome.map_err(|source| StrataError::producer_at_setup(config.name(), source))?;
    config.update(data, options.partial);
    Ok(())
}

/// Apply a steady-state producer outcome. Failures leave the view untouched.
fn apply_refresh(config: &Config, outcome: Result<Mapping, ProducerError>, options: &WatchOptions) {
    match outcome {
        Ok(data) => config.update(data, options.partial),
        Err(source) => options
            .on_error
            .report(&StrataError::producer(config.name(), source)),
    }
}

impl Config {
    /// Refresh this config from `producer` on a dedicated thread every
    /// `interval`.
    ///
    /// The producer runs once on the calling thread before this returns. The
    /// thread holds only a weak reference and stops at its next tick after
    /// the last `Arc<Config>` is dropped.
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use std::time::Duration;
    /// use strata_config::{Config, WatchOptions, value::mapping_from_json};
    /// use serde_json::json;
    ///
    /// let config = Arc::new(Config::new());
    /// let _handle = config
    ///     .watch(
    ///         || Ok(mapping_from_json(json!({"ready": true})).unwrap_or_default()),
    ///         Duration::from_secs(30),
    ///         WatchOptions::new(),
    ///     )
    ///     .expect("initial refresh succeeds");
    /// assert_eq!(config.read(["ready"]).and_then(|n| n.as_bool()), Some(true));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::ProducerAtSetup`] if the initial call fails
    /// (the view is left unchanged and no thread is started), or
    /// [`StrataError::Spawn`] if the thread cannot be created.
    pub fn watch<P>(
        self: &Arc<Self>,
        producer: P,
        interval: Duration,
        options: WatchOptions,
    ) -> StrataResult<WatchHandle>
    where
        P: FnMut() -> Result<Mapping, ProducerError> + Send + 'static,
    {
        ThreadedPoller::new().start(self, producer, interval, options)
    }

    /// Refresh this config from an async `producer` as a task on
    /// `scheduler`.
    ///
    /// The first refresh is awaited inline. Ticks of one watcher never
    /// overlap; missed ticks are delayed rather than bunched. Cancel by
    /// aborting the returned handle or shutting the runtime down.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::ProducerAtSetup`] if the first refresh fails.
    #[cfg(feature = "async")]
    pub async fn watch_async<P, Fut>(
        self: &Arc<Self>,
        scheduler: &tokio::runtime::Handle,
        producer: P,
        interval: Duration,
        options: WatchOptions,
    ) -> StrataResult<ScheduledWatch>
    where
        P: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = Result<Mapping, ProducerError>> + Send + 'static,
    {
        ScheduledRefresh::new(scheduler.clone())
            .start(self, producer, interval, options)
            .await
    }
}

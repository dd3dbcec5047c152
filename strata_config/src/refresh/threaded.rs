//! Polling on a dedicated OS thread.

use std::borrow::Cow;
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::{RefreshStrategy, WatchOptions, apply_initial, apply_refresh};
use crate::value::Mapping;
use crate::{Config, ProducerError, StrataError, StrataResult};

/// Thread name used when none is given.
pub const DEFAULT_THREAD_NAME: &str = "strata-config-watch";

/// Refresh strategy that sleeps and polls on its own thread.
#[derive(Clone, Debug)]
pub struct ThreadedPoller {
    thread_name: Cow<'static, str>,
}

impl Default for ThreadedPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadedPoller {
    /// Poller whose thread is named [`DEFAULT_THREAD_NAME`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            thread_name: Cow::Borrowed(DEFAULT_THREAD_NAME),
        }
    }

    /// Poller whose thread carries `name`.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            thread_name: name.into(),
        }
    }
}

impl<P> RefreshStrategy<P> for ThreadedPoller
where
    P: FnMut() -> Result<Mapping, ProducerError> + Send + 'static,
{
    type Output = StrataResult<WatchHandle>;

    fn start(
        self,
        config: &Arc<Config>,
        mut producer: P,
        interval: Duration,
        options: WatchOptions,
    ) -> Self::Output {
        apply_initial(config, producer(), &options)?;
        if !options.refresh {
            return Ok(WatchHandle { thread: None });
        }
        let weak = Arc::downgrade(config);
        let name = self.thread_name.into_owned();
        tracing::debug!(config = %config.name(), thread = %name, ?interval, "starting watcher thread");
        let thread = thread::Builder::new()
            .name(name)
            .spawn(move || poll_loop(&weak, producer, interval, &options))
            .map_err(|source| Arc::new(StrataError::Spawn { source }))?;
        Ok(WatchHandle {
            thread: Some(thread),
        })
    }
}

fn poll_loop<P>(config: &Weak<Config>, mut producer: P, interval: Duration, options: &WatchOptions)
where
    P: FnMut() -> Result<Mapping, ProducerError>,
{
    loop {
        thread::sleep(interval);
        if config.strong_count() == 0 {
            break;
        }
        let outcome = producer();
        let Some(config) = config.upgrade() else {
            break;
        };
        apply_refresh(&config, outcome, options);
    }
    tracing::debug!("config dropped; watcher thread exiting");
}

/// Handle to a threaded watcher.
///
/// Dropping the handle detaches the thread; it keeps polling until the
/// config is dropped.
#[derive(Debug)]
pub struct WatchHandle {
    thread: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Returns `true` while a polling thread exists and has not exited.
    /// Always `false` when refresh was disabled.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|thread| !thread.is_finished())
    }

    /// Name of the polling thread, if one was started.
    #[must_use]
    pub fn thread_name(&self) -> Option<&str> {
        self.thread.as_ref().and_then(|thread| thread.thread().name())
    }

    /// Wait for the polling thread to exit. Returns immediately when no
    /// thread was started.
    ///
    /// The thread only exits after the config has been dropped.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the polling thread panicked.
    pub fn join(self) -> thread::Result<()> {
        self.thread.map_or(Ok(()), JoinHandle::join)
    }
}

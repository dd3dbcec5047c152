//! Cooperative refresh as a repeating task on a tokio runtime.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use super::{RefreshStrategy, WatchOptions, apply_initial, apply_refresh};
use crate::value::Mapping;
use crate::{Config, ProducerError, StrataResult};

/// `tokio::time::interval` rejects a zero period.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Future returned by [`ScheduledRefresh::start`].
pub type StartFuture = Pin<Box<dyn Future<Output = StrataResult<ScheduledWatch>> + Send>>;

/// Refresh strategy that spawns its loop on a tokio runtime.
#[derive(Clone, Debug)]
pub struct ScheduledRefresh {
    handle: Handle,
}

impl ScheduledRefresh {
    /// Schedule on the runtime behind `handle`.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl<P, Fut> RefreshStrategy<P> for ScheduledRefresh
where
    P: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Mapping, ProducerError>> + Send + 'static,
{
    type Output = StartFuture;

    fn start(
        self,
        config: &Arc<Config>,
        mut producer: P,
        period: Duration,
        options: WatchOptions,
    ) -> Self::Output {
        let config = Arc::clone(config);
        Box::pin(async move {
            apply_initial(&config, producer().await, &options)?;
            if !options.refresh {
                return Ok(ScheduledWatch { task: None });
            }
            tracing::debug!(config = %config.name(), ?period, "scheduling refresh task");
            let weak = Arc::downgrade(&config);
            let task = self
                .handle
                .spawn(refresh_task(weak, producer, period, options));
            Ok(ScheduledWatch { task: Some(task) })
        })
    }
}

async fn refresh_task<P, Fut>(
    config: Weak<Config>,
    mut producer: P,
    period: Duration,
    options: WatchOptions,
) where
    P: FnMut() -> Fut,
    Fut: Future<Output = Result<Mapping, ProducerError>>,
{
    let mut ticker = interval(period.max(MIN_PERIOD));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the initial refresh already ran.
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if config.strong_count() == 0 {
            break;
        }
        let outcome = producer().await;
        // Only hold the config while applying, not across the producer call.
        let Some(config) = config.upgrade() else {
            break;
        };
        apply_refresh(&config, outcome, &options);
    }
    tracing::debug!("config dropped; refresh task exiting");
}

/// Handle to a scheduled watcher.
///
/// Dropping the handle detaches the task.
#[derive(Debug)]
pub struct ScheduledWatch {
    task: Option<JoinHandle<()>>,
}

impl ScheduledWatch {
    /// Stop the refresh task. Does nothing when refresh was disabled.
    pub fn abort(&self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }

    /// Returns `true` while a refresh task exists and has not completed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// The underlying task handle, if a task was spawned.
    #[must_use]
    pub fn into_task(self) -> Option<JoinHandle<()>> {
        self.task
    }
}

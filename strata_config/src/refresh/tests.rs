//! Unit tests for the refresh strategies.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, ensure};
use parking_lot::Mutex;
use rstest::rstest;
use serde_json::json;
use test_helpers::producer::{ScriptedProducer, Step};
use test_helpers::wait::wait_until;

use super::{ErrorSink, RefreshStrategy, ThreadedPoller, WatchOptions};
use crate::value::{Mapping, mapping_from_json};
use crate::{Config, Layer, StrataError};

const TICK: Duration = Duration::from_millis(10);
const PATIENCE: Duration = Duration::from_secs(5);

fn mapping(value: serde_json::Value) -> Mapping {
    mapping_from_json(value).unwrap_or_default()
}

fn counter(config: &Config) -> Option<i64> {
    config.read(["counter"]).and_then(|n| n.as_i64())
}

/// Sink recording the counter visible in `config` at each producer failure.
fn recording_sink(config: &Arc<Config>) -> (ErrorSink, Arc<Mutex<Vec<Option<i64>>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = Arc::clone(&seen);
    let config = Arc::downgrade(config);
    let sink = ErrorSink::custom(move |err| {
        if matches!(err, StrataError::Producer { .. }) {
            let visible = config.upgrade().and_then(|config| counter(&config));
            record.lock().push(visible);
        }
    });
    (sink, seen)
}

fn recovering_script() -> ScriptedProducer<Mapping> {
    ScriptedProducer::new([
        Step::Emit(mapping(json!({"counter": 1, "stale": true}))),
        Step::Fail("upstream unavailable".into()),
        Step::Emit(mapping(json!({"counter": 3}))),
    ])
}

#[rstest]
fn watch_applies_the_first_refresh_before_returning() -> Result<()> {
    let config = Arc::new(Config::named("svc"));
    let producer = ScriptedProducer::new([Step::Emit(mapping(json!({"counter": 1})))]);
    let source = producer.clone();
    let _handle = config
        .watch(move || source.call(), Duration::from_secs(60), WatchOptions::new())
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(counter(&config) == Some(1), "initial refresh not applied");
    ensure!(producer.calls() == 1, "producer called {} times", producer.calls());
    Ok(())
}

#[rstest]
fn watch_keeps_refreshing() -> Result<()> {
    let config = Arc::new(Config::new());
    let producer = ScriptedProducer::new([
        Step::Emit(mapping(json!({"counter": 1, "stable": "yes"}))),
        Step::Emit(mapping(json!({"counter": 2}))),
        Step::Emit(mapping(json!({"counter": 3}))),
    ]);
    let source = producer.clone();
    let handle = config
        .watch(move || source.call(), TICK, WatchOptions::new())
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(handle.is_running(), "poller should be running");
    ensure!(
        wait_until(PATIENCE, || counter(&config) == Some(3)),
        "refresh did not reach the last step"
    );
    ensure!(
        config.read(["stable"]).as_ref().and_then(|n| n.as_str()) == Some("yes"),
        "partial refresh dropped an untouched key"
    );
    Ok(())
}

#[rstest]
fn full_refresh_replaces_the_view() -> Result<()> {
    let config = Arc::new(Config::new());
    let producer = ScriptedProducer::new([
        Step::Emit(mapping(json!({"counter": 1, "stale": true}))),
        Step::Emit(mapping(json!({"counter": 2}))),
    ]);
    let _handle = config
        .watch(
            move || producer.call(),
            TICK,
            WatchOptions::new().partial(false),
        )
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(
        wait_until(PATIENCE, || counter(&config) == Some(2)),
        "second step never applied"
    );
    ensure!(config.read(["stale"]).is_none(), "replaced key survived");
    Ok(())
}

#[rstest]
fn steady_state_failures_keep_the_view_until_recovery() -> Result<()> {
    let config = Arc::new(Config::new());
    let producer = recovering_script();
    let source = producer.clone();
    let (sink, seen) = recording_sink(&config);
    let _handle = config
        .watch(
            move || source.call(),
            TICK,
            WatchOptions::new().partial(false).on_error(sink),
        )
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(
        wait_until(PATIENCE, || counter(&config) == Some(3)),
        "refresh never recovered after the failure"
    );
    let seen = seen.lock().clone();
    ensure!(
        seen == [Some(1)],
        "failure not reported once against the first view: {seen:?}"
    );
    ensure!(
        config.get_view() == Some(Layer::wrap(mapping(json!({"counter": 3})))),
        "view should equal the third output"
    );
    ensure!(producer.calls() >= 3, "producer called {} times", producer.calls());
    Ok(())
}

#[rstest]
fn setup_failure_is_returned_and_nothing_starts() -> Result<()> {
    let config = Arc::new(Config::named("svc"));
    let producer: ScriptedProducer<Mapping> = ScriptedProducer::new([Step::Fail("nope".into())]);
    let source = producer.clone();
    let err = config
        .watch(move || source.call(), TICK, WatchOptions::new())
        .err()
        .ok_or_else(|| anyhow!("setup should fail"))?;
    ensure!(
        matches!(&*err, StrataError::ProducerAtSetup { config, .. } if config == "svc"),
        "unexpected error: {err}"
    );
    ensure!(!config.is_loaded(), "failed setup must not publish a view");
    std::thread::sleep(TICK * 5);
    ensure!(producer.calls() == 1, "no loop may run after a setup failure");
    Ok(())
}

#[rstest]
fn disabled_refresh_runs_once() -> Result<()> {
    let config = Arc::new(Config::new());
    let producer = ScriptedProducer::new([Step::Emit(mapping(json!({"counter": 1})))]);
    let source = producer.clone();
    let handle = config
        .watch(
            move || source.call(),
            TICK,
            WatchOptions::new().refresh(false),
        )
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(!handle.is_running(), "no thread expected");
    ensure!(handle.thread_name().is_none(), "no thread expected");
    std::thread::sleep(TICK * 5);
    ensure!(producer.calls() == 1, "producer ran again");
    ensure!(handle.join().is_ok(), "join without a thread must succeed");
    Ok(())
}

#[rstest]
fn poller_thread_exits_after_the_config_is_dropped() -> Result<()> {
    let config = Arc::new(Config::new());
    let producer = ScriptedProducer::new([Step::Emit(mapping(json!({"counter": 1})))]);
    let handle = ThreadedPoller::named("cfg-test-poller")
        .start(&config, move || producer.call(), TICK, WatchOptions::new())
        .map_err(|err| anyhow!("{err}"))?;
    ensure!(
        handle.thread_name() == Some("cfg-test-poller"),
        "thread name not applied"
    );
    drop(config);
    ensure!(handle.join().is_ok(), "poller thread panicked");
    Ok(())
}

#[rstest]
fn silent_sink_swallows_failures() {
    ErrorSink::Silent.report(&StrataError::producer("svc", "ignored".into()));
}

#[rstest]
#[case(ErrorSink::Log, "Log")]
#[case(ErrorSink::Silent, "Silent")]
#[case(ErrorSink::custom(|_| {}), "Custom(..)")]
fn sinks_have_readable_debug_output(#[case] sink: ErrorSink, #[case] expected: &str) {
    assert_eq!(format!("{sink:?}"), expected);
}

#[rstest]
fn watch_options_default_to_partial_repeating_refresh() {
    let options = WatchOptions::default();
    assert!(options.is_partial());
    assert!(options.is_refresh());
    assert!(matches!(options.error_sink(), ErrorSink::Log));
}

#[cfg(feature = "async")]
mod scheduled {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::runtime::Handle;
    use tokio::sync::Notify;

    use crate::ProducerError;

    async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = tokio::time::Instant::now() + PATIENCE;
        while tokio::time::Instant::now() < deadline {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        condition()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_watch_refreshes_on_the_runtime() -> Result<()> {
        let config = Arc::new(Config::new());
        let producer = ScriptedProducer::new([
            Step::Emit(mapping(json!({"counter": 1}))),
            Step::Emit(mapping(json!({"counter": 2}))),
        ]);
        let source = producer.clone();
        let watch = config
            .watch_async(
                &Handle::current(),
                move || {
                    let source = source.clone();
                    async move { source.call() }
                },
                TICK,
                WatchOptions::new(),
            )
            .await
            .map_err(|err| anyhow!("{err}"))?;
        ensure!(counter(&config) == Some(1), "first refresh not awaited");
        ensure!(watch.is_running(), "refresh task should be running");
        ensure!(
            eventually(|| counter(&config) == Some(2)).await,
            "task never refreshed"
        );
        watch.abort();
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_failures_keep_the_view_until_recovery() -> Result<()> {
        let config = Arc::new(Config::new());
        let producer = recovering_script();
        let source = producer.clone();
        let (sink, seen) = recording_sink(&config);
        let watch = config
            .watch_async(
                &Handle::current(),
                move || {
                    let source = source.clone();
                    async move { source.call() }
                },
                TICK,
                WatchOptions::new().partial(false).on_error(sink),
            )
            .await
            .map_err(|err| anyhow!("{err}"))?;
        ensure!(
            eventually(|| counter(&config) == Some(3)).await,
            "task never recovered after the failure"
        );
        let seen = seen.lock().clone();
        ensure!(
            seen == [Some(1)],
            "failure not reported once against the first view: {seen:?}"
        );
        ensure!(
            config.get_view() == Some(Layer::wrap(mapping(json!({"counter": 3})))),
            "view should equal the third output"
        );
        ensure!(watch.is_running(), "task stopped after a failure");
        watch.abort();
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn in_flight_refresh_does_not_keep_the_config_alive() -> Result<()> {
        let calls = Arc::new(AtomicUsize::new(0));
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let producer = {
            let (calls, started, release) =
                (Arc::clone(&calls), Arc::clone(&started), Arc::clone(&release));
            move || {
                let call = calls.fetch_add(1, Ordering::SeqCst);
                let started = Arc::clone(&started);
                let release = Arc::clone(&release);
                async move {
                    if call > 0 {
                        started.notify_one();
                        release.notified().await;
                    }
                    Ok::<_, ProducerError>(mapping(json!({"counter": call})))
                }
            }
        };
        let config = Arc::new(Config::new());
        let weak = Arc::downgrade(&config);
        let watch = config
            .watch_async(&Handle::current(), producer, TICK, WatchOptions::new())
            .await
            .map_err(|err| anyhow!("{err}"))?;
        tokio::time::timeout(PATIENCE, started.notified()).await?;
        drop(config);
        ensure!(
            weak.upgrade().is_none(),
            "a pending producer call kept the config alive"
        );
        release.notify_one();
        let task = watch
            .into_task()
            .ok_or_else(|| anyhow!("task should exist"))?;
        tokio::time::timeout(PATIENCE, task).await??;
        ensure!(calls.load(Ordering::SeqCst) == 2, "producer ran after the drop");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_setup_failure_is_returned() -> Result<()> {
        let config = Arc::new(Config::new());
        let producer: ScriptedProducer<Mapping> =
            ScriptedProducer::new([Step::Fail("offline".into())]);
        let result = config
            .watch_async(
                &Handle::current(),
                move || {
                    let producer = producer.clone();
                    async move { producer.call() }
                },
                TICK,
                WatchOptions::new(),
            )
            .await;
        let err = result.err().ok_or_else(|| anyhow!("setup should fail"))?;
        ensure!(
            matches!(&*err, StrataError::ProducerAtSetup { .. }),
            "unexpected error: {err}"
        );
        ensure!(!config.is_loaded(), "failed setup must not publish a view");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_refresh_can_be_disabled() -> Result<()> {
        let config = Arc::new(Config::new());
        let producer = ScriptedProducer::new([Step::Emit(mapping(json!({"counter": 1})))]);
        let source = producer.clone();
        let watch = config
            .watch_async(
                &Handle::current(),
                move || {
                    let source = source.clone();
                    async move { source.call() }
                },
                TICK,
                WatchOptions::new().refresh(false),
            )
            .await
            .map_err(|err| anyhow!("{err}"))?;
        ensure!(!watch.is_running(), "no task expected");
        ensure!(watch.into_task().is_none(), "no task expected");
        tokio::time::sleep(TICK * 5).await;
        ensure!(producer.calls() == 1, "producer ran again");
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn async_task_ends_after_the_config_is_dropped() -> Result<()> {
        let config = Arc::new(Config::new());
        let producer = ScriptedProducer::new([Step::Emit(mapping(json!({"counter": 1})))]);
        let watch = config
            .watch_async(
                &Handle::current(),
                move || {
                    let producer = producer.clone();
                    async move { producer.call() }
                },
                TICK,
                WatchOptions::new(),
            )
            .await
            .map_err(|err| anyhow!("{err}"))?;
        drop(config);
        let task = watch
            .into_task()
            .ok_or_else(|| anyhow!("task should exist"))?;
        tokio::time::timeout(PATIENCE, task).await??;
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn aborted_tasks_stop_refreshing() -> Result<()> {
        let config = Arc::new(Config::new());
        let producer = ScriptedProducer::new([Step::Emit(mapping(json!({"counter": 1})))]);
        let source = producer.clone();
        let watch = config
            .watch_async(
                &Handle::current(),
                move || {
                    let source = source.clone();
                    async move { source.call() }
                },
                TICK,
                WatchOptions::new(),
            )
            .await
            .map_err(|err| anyhow!("{err}"))?;
        watch.abort();
        ensure!(
            eventually(|| !watch.is_running()).await,
            "task still running after abort"
        );
        let settled = producer.calls();
        tokio::time::sleep(TICK * 5).await;
        ensure!(producer.calls() == settled, "aborted task kept polling");
        Ok(())
    }
}

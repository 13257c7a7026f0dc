// Worker integration: hand-driven ticks, pause/resume, interval changes, shutdown

mod common;

use common::{ChannelTicker, RecordingSink, ScriptedSource, SteadySource, unavailable};
use hostwatch::engine::{Engine, EngineSettings, EngineState};
use hostwatch::metric_source::MetricSource;
use hostwatch::models::{EngineView, SamplingStatus};
use hostwatch::worker::{WorkerConfig, WorkerDeps, spawn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Duration, sleep, timeout};

struct Harness {
    engine: Engine,
    ticks: mpsc::UnboundedSender<()>,
    views: mpsc::UnboundedReceiver<EngineView>,
    resets: Arc<std::sync::Mutex<Vec<Duration>>>,
    shutdown: tokio::sync::oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

fn start(source: Arc<dyn MetricSource>) -> Harness {
    let engine = Engine::new(EngineState::new(EngineSettings::default()).unwrap());
    let (ticks, ticker) = ChannelTicker::new();
    let resets = ticker.resets.clone();
    let (sink, views) = RecordingSink::new();
    let (shutdown, shutdown_rx) = tokio::sync::oneshot::channel();
    let handle = spawn(
        WorkerDeps {
            engine: engine.clone(),
            source,
            sink: Arc::new(sink),
            shutdown_rx,
        },
        WorkerConfig {
            stats_log_interval_secs: 3600,
        },
        ticker,
    );
    Harness {
        engine,
        ticks,
        views,
        resets,
        shutdown,
        handle,
    }
}

async fn next_view(views: &mut mpsc::UnboundedReceiver<EngineView>) -> EngineView {
    timeout(Duration::from_secs(5), views.recv())
        .await
        .expect("timed out waiting for a view")
        .expect("sink channel closed")
}

/// Lets the worker task observe notifications and queued ticks.
async fn settle() {
    sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn each_tick_publishes_one_view() {
    let mut h = start(Arc::new(SteadySource::new()));
    for expected in 1..=3 {
        h.ticks.send(()).unwrap();
        let view = next_view(&mut h.views).await;
        assert_eq!(view.history.len(), expected);
        assert_eq!(view.status, SamplingStatus::Ok);
    }
    let _ = h.shutdown.send(());
    h.handle.await.unwrap();
}

#[tokio::test]
async fn pause_suspends_ticks_and_resume_does_not_replay_paused_window() {
    let mut h = start(Arc::new(SteadySource::new()));
    h.ticks.send(()).unwrap();
    assert_eq!(next_view(&mut h.views).await.history.len(), 1);

    h.engine.pause().unwrap();
    settle().await;
    h.ticks.send(()).unwrap();
    h.ticks.send(()).unwrap();
    settle().await;
    assert!(h.views.try_recv().is_err(), "no view while paused");
    assert_eq!(h.engine.view().unwrap().history.len(), 1);

    h.engine.resume().unwrap();
    settle().await;
    assert_eq!(h.resets.lock().unwrap().as_slice(), &[Duration::from_millis(2_000)]);

    h.ticks.send(()).unwrap();
    let view = next_view(&mut h.views).await;
    assert_eq!(view.history.len(), 2);
    assert_eq!(view.interval_ms, 2_000);
    assert!(h.views.try_recv().is_err());

    let _ = h.shutdown.send(());
    h.handle.await.unwrap();
}

#[tokio::test]
async fn interval_change_resets_ticker_and_rejected_change_does_not() {
    let h = start(Arc::new(SteadySource::new()));
    h.engine.set_interval_ms(5_000).unwrap();
    settle().await;
    assert!(h.engine.set_interval_secs(0.5).is_err());
    settle().await;
    assert_eq!(h.resets.lock().unwrap().as_slice(), &[Duration::from_millis(5_000)]);
    assert_eq!(h.engine.view().unwrap().interval_ms, 5_000);

    let _ = h.shutdown.send(());
    h.handle.await.unwrap();
}

#[tokio::test]
async fn source_failure_publishes_status_without_touching_history() {
    let clock_sample = common::SampleClock::new().next();
    let mut h = start(Arc::new(ScriptedSource::new(vec![
        Ok(clock_sample),
        Err(unavailable()),
    ])));

    h.ticks.send(()).unwrap();
    let first = next_view(&mut h.views).await;
    assert_eq!(first.history.len(), 1);

    h.ticks.send(()).unwrap();
    let second = next_view(&mut h.views).await;
    assert_eq!(second.history.len(), 1);
    assert_eq!(second.active_alerts, first.active_alerts);
    assert!(matches!(
        second.status,
        SamplingStatus::SourceUnavailable { .. }
    ));

    let _ = h.shutdown.send(());
    h.handle.await.unwrap();
}

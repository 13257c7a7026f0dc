// Background sampling worker.
// One tick at a time: sample on the blocking pool (outside the engine lock), ingest, publish.

use crate::engine::{Engine, TickOutcome};
use crate::error::{EngineError, EngineResult};
use crate::metric_source::MetricSource;
use crate::models::EngineView;
use crate::scheduler::{SchedulerState, Ticker};
use crate::sink::PresentationSink;
use std::sync::Arc;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::instrument;

/// Engine, source, sink and shutdown for the worker.
pub struct WorkerDeps {
    pub engine: Engine,
    pub source: Arc<dyn MetricSource>,
    pub sink: Arc<dyn PresentationSink>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker logging config.
pub struct WorkerConfig {
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
}

/// Spawns the sampling loop. `ticker` supplies tick boundaries; it is reset when the
/// interval changes or sampling resumes, so the next tick is one full interval away.
pub fn spawn<T>(deps: WorkerDeps, config: WorkerConfig, ticker: T) -> tokio::task::JoinHandle<()>
where
    T: Ticker + 'static,
{
    tokio::spawn(run(deps, config, ticker))
}

#[instrument(name = "worker", skip_all)]
async fn run<T: Ticker>(deps: WorkerDeps, config: WorkerConfig, mut ticker: T) {
    let WorkerDeps {
        engine,
        source,
        sink,
        mut shutdown_rx,
    } = deps;

    let (mut paused, mut period) = match engine.schedule() {
        Ok((state, period)) => (state == SchedulerState::Paused, period),
        Err(e) => {
            tracing::error!(error = %e, operation = "schedule", "worker could not start");
            return;
        }
    };

    let mut stats_log_tick = interval(Duration::from_secs(config.stats_log_interval_secs));
    stats_log_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut ticks_total: u64 = 0;
    let mut skipped_total: u64 = 0;

    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::debug!("Worker shutting down");
                break;
            }
            _ = engine.changed() => {
                match engine.schedule() {
                    Ok((state, new_period)) => {
                        let now_paused = state == SchedulerState::Paused;
                        if new_period != period || (paused && !now_paused) {
                            ticker.reset(new_period);
                        }
                        period = new_period;
                        paused = now_paused;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, operation = "schedule", "engine state unavailable");
                        break;
                    }
                }
            }
            _ = ticker.tick(), if !paused => {
                match run_tick(&engine, &source).await {
                    Ok(Some((outcome, view))) => {
                        ticks_total += 1;
                        if matches!(outcome, TickOutcome::Skipped(_)) {
                            skipped_total += 1;
                        }
                        sink.publish(&view);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::error!(error = %e, operation = "tick", "engine state unavailable");
                        break;
                    }
                }
            }
            _ = stats_log_tick.tick() => {
                let alert_total = engine.view().map(|v| v.alert_total).unwrap_or(0);
                tracing::info!(
                    ticks_total,
                    skipped_total,
                    alert_total,
                    paused,
                    interval_ms = period.as_millis() as u64,
                    "app stats"
                );
            }
        }
    }
}

/// One round. `None` when the engine was paused before sampling started.
async fn run_tick(
    engine: &Engine,
    source: &Arc<dyn MetricSource>,
) -> EngineResult<Option<(TickOutcome, EngineView)>> {
    if engine.is_paused()? {
        return Ok(None);
    }
    let source = source.clone();
    let sample = tokio::task::spawn_blocking(move || source.sample())
        .await
        .unwrap_or_else(|e| {
            Err(EngineError::source_unavailable(
                "sample",
                format!("sampling task join: {}", e),
            ))
        });
    engine.ingest(sample).map(Some)
}

// Shared engine handle: one mutex serializes ticks and configuration calls

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::time::Duration;

use super::{EngineState, TickOutcome};
use crate::error::{EngineError, EngineResult};
use crate::metric_source::MetricSource;
use crate::models::{AlertEvent, EngineView, Metric, RawSample};
use crate::scheduler::SchedulerState;

/// Cloneable handle. Readers always get a view copied under the lock, so they
/// never observe a half-applied tick.
#[derive(Clone)]
pub struct Engine {
    state: Arc<Mutex<EngineState>>,
    changed: Arc<Notify>,
}

impl Engine {
    pub fn new(state: EngineState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            changed: Arc::new(Notify::new()),
        }
    }

    fn lock(&self) -> EngineResult<MutexGuard<'_, EngineState>> {
        self.state
            .lock()
            .map_err(|e| EngineError::Fatal(format!("engine state lock poisoned: {}", e)))
    }

    /// Apply a configuration change, wake the worker and return the resulting view.
    /// Errors are surfaced in the view's `last_config_error` as well as returned.
    fn configure<F>(&self, f: F) -> EngineResult<EngineView>
    where
        F: FnOnce(&mut EngineState) -> EngineResult<()>,
    {
        let mut state = self.lock()?;
        f(&mut *state)?;
        let view = state.view();
        drop(state);
        self.changed.notify_one();
        Ok(view)
    }

    /// Resolves after the next configuration change (a change made before the
    /// call is not lost; one pending wake-up is stored).
    pub async fn changed(&self) {
        self.changed.notified().await;
    }

    pub fn view(&self) -> EngineResult<EngineView> {
        Ok(self.lock()?.view())
    }

    pub fn alert_history(&self) -> EngineResult<Vec<AlertEvent>> {
        Ok(self.lock()?.alerts().history().to_vec())
    }

    pub fn schedule(&self) -> EngineResult<(SchedulerState, Duration)> {
        let state = self.lock()?;
        Ok((state.scheduler().state(), state.scheduler().interval()))
    }

    pub fn is_paused(&self) -> EngineResult<bool> {
        Ok(self.lock()?.is_paused())
    }

    pub fn ingest(&self, sample: EngineResult<RawSample>) -> EngineResult<(TickOutcome, EngineView)> {
        let mut state = self.lock()?;
        let outcome = state.ingest(sample);
        Ok((outcome, state.view()))
    }

    /// Blocking tick: samples without holding the lock, then ingests.
    /// Returns `None` when paused.
    pub fn tick_blocking(
        &self,
        source: &dyn MetricSource,
    ) -> EngineResult<Option<(TickOutcome, EngineView)>> {
        if self.is_paused()? {
            return Ok(None);
        }
        let sample = source.sample();
        self.ingest(sample).map(Some)
    }

    pub fn pause(&self) -> EngineResult<EngineView> {
        self.configure(|s| {
            s.pause();
            Ok(())
        })
    }

    pub fn resume(&self) -> EngineResult<EngineView> {
        self.configure(|s| {
            s.resume();
            Ok(())
        })
    }

    pub fn set_interval_ms(&self, interval_ms: u64) -> EngineResult<EngineView> {
        self.configure(|s| s.set_interval_ms(interval_ms))
    }

    pub fn set_interval_secs(&self, secs: f64) -> EngineResult<EngineView> {
        self.configure(|s| s.set_interval_secs(secs))
    }

    pub fn set_interval_secs_str(&self, input: &str) -> EngineResult<EngineView> {
        self.configure(|s| s.set_interval_secs_str(input))
    }

    pub fn set_threshold(&self, metric: Metric, value: f64) -> EngineResult<EngineView> {
        self.configure(|s| s.set_threshold(metric, value))
    }

    pub fn set_threshold_str(&self, metric: Metric, input: &str) -> EngineResult<EngineView> {
        self.configure(|s| s.set_threshold_str(metric, input))
    }

    pub fn set_threshold_named(&self, metric: &str, input: &str) -> EngineResult<EngineView> {
        self.configure(|s| s.set_threshold_named(metric, input))
    }

    pub fn set_history_capacity(&self, capacity: usize) -> EngineResult<EngineView> {
        self.configure(|s| s.set_history_capacity(capacity))
    }

    pub fn set_history_capacity_str(&self, input: &str) -> EngineResult<EngineView> {
        self.configure(|s| s.set_history_capacity_str(input))
    }

    pub fn set_network_series_visibility(&self, sent: bool, recv: bool) -> EngineResult<EngineView> {
        self.configure(|s| {
            s.set_network_series_visibility(sent, recv);
            Ok(())
        })
    }

    pub fn clear_active_alerts(&self) -> EngineResult<EngineView> {
        self.configure(|s| {
            s.clear_active_alerts();
            Ok(())
        })
    }
}

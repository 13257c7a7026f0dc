// Sampling/alerting engine state. Owned, synchronous and free of timers so it can be
// driven tick by tick; `Engine` wraps it for sharing between the worker and the routes.

mod handle;

pub use handle::Engine;

use crate::alert_log::{ACTIVE_ALERTS_CAPACITY, AlertLog};
use crate::error::{EngineError, EngineResult};
use crate::evaluator::evaluate;
use crate::history::{DEFAULT_HISTORY_CAPACITY, HistoryBuffer};
use crate::metric_source::MetricSource;
use crate::models::{AlertEvent, EngineView, Metric, RawSample, SamplingStatus, Snapshot};
use crate::rate::RateComputer;
use crate::scheduler::{DEFAULT_INTERVAL_MS, Scheduler};
use crate::thresholds::ThresholdSet;

/// Startup values for a fresh engine.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub interval_ms: u64,
    pub history_capacity: usize,
    pub active_alert_capacity: usize,
    pub thresholds: ThresholdSet,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            active_alert_capacity: ACTIVE_ALERTS_CAPACITY,
            thresholds: ThresholdSet::default(),
        }
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A snapshot was appended; `alerts` are the events raised for it (possibly none).
    Sampled {
        snapshot: Snapshot,
        alerts: Vec<AlertEvent>,
    },
    /// The source failed; history and alerts were left untouched.
    Skipped(EngineError),
    /// Scheduler is paused; nothing was sampled.
    Paused,
}

pub struct EngineState {
    scheduler: Scheduler,
    history: HistoryBuffer,
    alerts: AlertLog,
    thresholds: ThresholdSet,
    rates: RateComputer,
    show_network_sent: bool,
    show_network_recv: bool,
    status: SamplingStatus,
    last_config_error: Option<String>,
}

impl EngineState {
    pub fn new(settings: EngineSettings) -> EngineResult<Self> {
        let scheduler = Scheduler::new(settings.interval_ms).map_err(into_fatal)?;
        let history = HistoryBuffer::with_capacity(settings.history_capacity).map_err(into_fatal)?;
        if settings.active_alert_capacity == 0 {
            return Err(EngineError::Fatal(
                "active alert capacity must be > 0".into(),
            ));
        }
        Ok(Self {
            scheduler,
            history,
            alerts: AlertLog::with_active_capacity(settings.active_alert_capacity),
            thresholds: settings.thresholds,
            rates: RateComputer::new(),
            show_network_sent: true,
            show_network_recv: true,
            status: SamplingStatus::Starting,
            last_config_error: None,
        })
    }

    /// Synchronous tick: sample (blocking) and ingest. Used by tests and single-threaded hosts;
    /// the worker samples outside the lock instead.
    pub fn tick(&mut self, source: &dyn MetricSource) -> TickOutcome {
        if self.scheduler.is_paused() {
            return TickOutcome::Paused;
        }
        let sample = source.sample();
        self.ingest(sample)
    }

    /// Apply one round's readings. Either the whole snapshot lands (history, rates,
    /// alerts) or, on error, nothing changes except the surfaced status.
    pub fn ingest(&mut self, sample: EngineResult<RawSample>) -> TickOutcome {
        let raw = match sample.and_then(check_readings) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, operation = "ingest", "round skipped");
                self.status = SamplingStatus::SourceUnavailable {
                    message: e.to_string(),
                };
                return TickOutcome::Skipped(e);
            }
        };

        let rate = self
            .rates
            .observe(raw.net_sent_bytes, raw.net_recv_bytes, raw.taken_at);
        let snapshot = Snapshot {
            timestamp: raw.timestamp,
            cpu_percent: raw.cpu_percent,
            memory_percent: raw.memory_percent,
            disk_percent: raw.disk_percent,
            process_count: raw.process_count,
            network_sent_cumulative_bytes: raw.net_sent_bytes,
            network_recv_cumulative_bytes: raw.net_recv_bytes,
            network_sent_rate_bytes_per_sec: rate.sent_bytes_per_sec,
            network_recv_rate_bytes_per_sec: rate.recv_bytes_per_sec,
            rate_is_meaningful: rate.meaningful,
        };

        self.history.append(snapshot.clone());
        let alerts = evaluate(&snapshot, &self.thresholds);
        for alert in &alerts {
            tracing::warn!(metric = %alert.metric, value = alert.value, threshold = alert.threshold, "{}", alert.message);
        }
        self.alerts.record(&alerts);
        self.status = SamplingStatus::Ok;
        tracing::debug!(
            operation = "ingest",
            history_len = self.history.len(),
            alerts = alerts.len(),
            "snapshot recorded"
        );
        TickOutcome::Sampled { snapshot, alerts }
    }

    pub fn pause(&mut self) {
        if self.scheduler.pause() {
            tracing::info!("sampling paused");
        }
        self.last_config_error = None;
    }

    pub fn resume(&mut self) {
        if self.scheduler.resume() {
            tracing::info!(interval_ms = self.scheduler.interval_ms(), "sampling resumed");
        }
        self.last_config_error = None;
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) -> EngineResult<()> {
        let result = self.scheduler.set_interval_ms(interval_ms);
        self.note_config("set_interval", result)
    }

    pub fn set_interval_secs(&mut self, secs: f64) -> EngineResult<()> {
        let result = self.scheduler.set_interval_secs(secs);
        self.note_config("set_interval", result)
    }

    pub fn set_interval_secs_str(&mut self, input: &str) -> EngineResult<()> {
        let result = self.scheduler.set_interval_secs_str(input);
        self.note_config("set_interval", result)
    }

    pub fn set_threshold(&mut self, metric: Metric, value: f64) -> EngineResult<()> {
        let result = self.thresholds.set(metric, value);
        self.note_config("set_threshold", result)
    }

    pub fn set_threshold_str(&mut self, metric: Metric, input: &str) -> EngineResult<()> {
        let result = self.thresholds.set_from_str(metric, input);
        self.note_config("set_threshold", result)
    }

    /// Metric given by name, limit as text. Unknown names are recorded like any other rejection.
    pub fn set_threshold_named(&mut self, metric: &str, input: &str) -> EngineResult<()> {
        let result = metric
            .parse::<Metric>()
            .and_then(|metric| self.thresholds.set_from_str(metric, input));
        self.note_config("set_threshold", result)
    }

    pub fn set_history_capacity(&mut self, capacity: usize) -> EngineResult<()> {
        let result = self.history.set_capacity(capacity);
        self.note_config("set_history_capacity", result)
    }

    pub fn set_history_capacity_str(&mut self, input: &str) -> EngineResult<()> {
        let result = input
            .trim()
            .parse::<usize>()
            .map_err(|_| {
                EngineError::invalid(format!(
                    "history capacity must be a non-negative integer, got {:?}",
                    input
                ))
            })
            .and_then(|capacity| self.history.set_capacity(capacity));
        self.note_config("set_history_capacity", result)
    }

    /// Presentation hint only; sampling and alerting ignore it.
    pub fn set_network_series_visibility(&mut self, sent: bool, recv: bool) {
        self.show_network_sent = sent;
        self.show_network_recv = recv;
    }

    pub fn clear_active_alerts(&mut self) {
        self.alerts.clear_active();
    }

    pub fn is_paused(&self) -> bool {
        self.scheduler.is_paused()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn status(&self) -> SamplingStatus {
        if self.scheduler.is_paused() {
            SamplingStatus::Paused
        } else {
            self.status.clone()
        }
    }

    pub fn last_config_error(&self) -> Option<&str> {
        self.last_config_error.as_deref()
    }

    pub fn view(&self) -> EngineView {
        self.view_with_tail(self.history.capacity())
    }

    pub fn view_with_tail(&self, n: usize) -> EngineView {
        EngineView {
            status: self.status(),
            paused: self.scheduler.is_paused(),
            interval_ms: self.scheduler.interval_ms(),
            current: self.history.latest().cloned(),
            history: self.history.tail(n),
            history_capacity: self.history.capacity(),
            active_alerts: self.alerts.active(),
            alert_total: self.alerts.len(),
            thresholds: self.thresholds,
            show_network_sent: self.show_network_sent,
            show_network_recv: self.show_network_recv,
            last_config_error: self.last_config_error.clone(),
            summary: self.history.summary(),
        }
    }

    fn note_config(&mut self, operation: &'static str, result: EngineResult<()>) -> EngineResult<()> {
        match &result {
            Ok(()) => {
                tracing::info!(
                    operation,
                    interval_ms = self.scheduler.interval_ms(),
                    history_capacity = self.history.capacity(),
                    "configuration updated"
                );
                self.last_config_error = None;
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "configuration rejected");
                self.last_config_error = Some(e.to_string());
            }
        }
        result
    }
}

fn into_fatal(e: EngineError) -> EngineError {
    match e {
        EngineError::InvalidConfiguration(msg) => EngineError::Fatal(msg),
        other => other,
    }
}

fn check_readings(raw: RawSample) -> EngineResult<RawSample> {
    let readings = [
        ("cpu", raw.cpu_percent),
        ("memory", raw.memory_percent),
        ("disk", raw.disk_percent),
    ];
    for (operation, value) in readings {
        if !value.is_finite() || value < 0.0 {
            return Err(EngineError::source_unavailable(
                operation,
                format!("invalid reading {}", value),
            ));
        }
    }
    Ok(raw)
}

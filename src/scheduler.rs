// Sampling schedule: Running/Paused state, bounded interval, and the ticking seam

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::time::{Duration, Instant, Interval, MissedTickBehavior, interval, interval_at};

use crate::error::{EngineError, EngineResult};

pub const MIN_INTERVAL_MS: u64 = 1_000;
pub const MAX_INTERVAL_MS: u64 = 10_000;
pub const DEFAULT_INTERVAL_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerState {
    Running,
    Paused,
}

/// Schedule bookkeeping. Does not own a timer; the worker reads it between ticks.
#[derive(Debug, Clone)]
pub struct Scheduler {
    state: SchedulerState,
    interval_ms: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self {
            state: SchedulerState::Running,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

impl Scheduler {
    pub fn new(interval_ms: u64) -> EngineResult<Self> {
        validate_interval_ms(interval_ms)?;
        Ok(Self {
            state: SchedulerState::Running,
            interval_ms,
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Returns true if the state changed.
    pub fn pause(&mut self) -> bool {
        let changed = self.state != SchedulerState::Paused;
        self.state = SchedulerState::Paused;
        changed
    }

    /// Returns true if the state changed.
    pub fn resume(&mut self) -> bool {
        let changed = self.state != SchedulerState::Running;
        self.state = SchedulerState::Running;
        changed
    }

    pub fn set_interval_ms(&mut self, interval_ms: u64) -> EngineResult<()> {
        validate_interval_ms(interval_ms)?;
        self.interval_ms = interval_ms;
        Ok(())
    }

    /// Text input in seconds, e.g. "2.5".
    pub fn set_interval_secs_str(&mut self, input: &str) -> EngineResult<()> {
        let secs: f64 = input.trim().parse().map_err(|_| {
            EngineError::invalid(format!("interval must be numeric seconds, got {:?}", input))
        })?;
        self.set_interval_secs(secs)
    }

    pub fn set_interval_secs(&mut self, secs: f64) -> EngineResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(EngineError::invalid(format!(
                "interval must be a positive number of seconds, got {}",
                secs
            )));
        }
        let ms = secs * 1000.0;
        if ms < MIN_INTERVAL_MS as f64 || ms > MAX_INTERVAL_MS as f64 {
            return Err(EngineError::invalid(format!(
                "interval must be between {} and {} s, got {}",
                MIN_INTERVAL_MS as f64 / 1000.0,
                MAX_INTERVAL_MS as f64 / 1000.0,
                secs
            )));
        }
        self.set_interval_ms(ms.round() as u64)
    }
}

pub fn validate_interval_ms(interval_ms: u64) -> EngineResult<()> {
    if !(MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&interval_ms) {
        return Err(EngineError::invalid(format!(
            "interval must be between {} and {} ms, got {}",
            MIN_INTERVAL_MS, MAX_INTERVAL_MS, interval_ms
        )));
    }
    Ok(())
}

/// Source of tick boundaries for the worker. Tests drive it by hand.
pub trait Ticker: Send {
    /// Completes at the next tick boundary.
    fn tick(&mut self) -> impl Future<Output = ()> + Send;

    /// Restart with `period`; the next tick lands one full period from now.
    fn reset(&mut self, period: Duration);
}

/// Wall-clock ticker. The first tick fires immediately; missed ticks are skipped, never bunched.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    pub fn new(period: Duration) -> Self {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self { interval }
    }
}

impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    fn reset(&mut self, period: Duration) {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = interval;
    }
}

// Shared test helpers
#![allow(dead_code)]

use hostwatch::error::{EngineError, EngineResult};
use hostwatch::metric_source::MetricSource;
use hostwatch::models::{EngineView, RawSample};
use hostwatch::scheduler::Ticker;
use hostwatch::sink::PresentationSink;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Readings with every metric well under the default thresholds.
pub fn quiet_sample(taken_at: Instant, timestamp: u64) -> RawSample {
    RawSample {
        timestamp,
        taken_at,
        cpu_percent: 10.0,
        memory_percent: 20.0,
        disk_percent: 30.0,
        process_count: 50,
        net_sent_bytes: 0,
        net_recv_bytes: 0,
    }
}

/// Builds consecutive samples one second apart.
pub struct SampleClock {
    start: Instant,
    step: u64,
}

impl SampleClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            step: 0,
        }
    }

    /// Next quiet sample, one second after the previous one.
    pub fn next(&mut self) -> RawSample {
        let s = quiet_sample(
            self.start + Duration::from_secs(self.step),
            1_700_000_000_000 + self.step * 1000,
        );
        self.step += 1;
        s
    }
}

pub fn unavailable() -> EngineError {
    EngineError::source_unavailable("cpu", "simulated failure")
}

/// Metric source that replays a script, then keeps failing.
pub struct ScriptedSource {
    script: Mutex<VecDeque<EngineResult<RawSample>>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<EngineResult<RawSample>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
        }
    }
}

impl MetricSource for ScriptedSource {
    fn sample(&self) -> EngineResult<RawSample> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::source_unavailable("script", "exhausted")))
    }
}

/// Source that always returns fresh quiet readings.
pub struct SteadySource {
    clock: Mutex<SampleClock>,
}

impl SteadySource {
    pub fn new() -> Self {
        Self {
            clock: Mutex::new(SampleClock::new()),
        }
    }
}

impl MetricSource for SteadySource {
    fn sample(&self) -> EngineResult<RawSample> {
        Ok(self.clock.lock().unwrap().next())
    }
}

/// Ticker driven by hand: each `()` sent is one tick. Reset drops queued ticks.
pub struct ChannelTicker {
    rx: mpsc::UnboundedReceiver<()>,
    pub resets: std::sync::Arc<Mutex<Vec<Duration>>>,
}

impl ChannelTicker {
    pub fn new() -> (mpsc::UnboundedSender<()>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            tx,
            Self {
                rx,
                resets: Default::default(),
            },
        )
    }
}

impl Ticker for ChannelTicker {
    async fn tick(&mut self) {
        if self.rx.recv().await.is_none() {
            std::future::pending::<()>().await;
        }
    }

    fn reset(&mut self, period: Duration) {
        while self.rx.try_recv().is_ok() {}
        self.resets.lock().unwrap().push(period);
    }
}

/// Forwards every published view to a channel.
pub struct RecordingSink {
    tx: mpsc::UnboundedSender<EngineView>,
}

impl RecordingSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<EngineView>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl PresentationSink for RecordingSink {
    fn publish(&self, view: &EngineView) {
        let _ = self.tx.send(view.clone());
    }
}

// Presentation sinks: receive one read-only view per tick

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;

use crate::models::{EngineView, SamplingStatus};

/// Rate limit for the "no receivers" note (avoid logging every tick when no client is connected)
const NO_RECEIVERS_LOG_INTERVAL: Duration = Duration::from_secs(60);

pub trait PresentationSink: Send + Sync {
    fn publish(&self, view: &EngineView);
}

/// Fans views out to WebSocket clients via a broadcast channel (slow clients lag, never block).
pub struct BroadcastSink {
    tx: broadcast::Sender<EngineView>,
    last_no_receivers_log: Mutex<Option<Instant>>,
}

impl BroadcastSink {
    pub fn new(tx: broadcast::Sender<EngineView>) -> Self {
        Self {
            tx,
            last_no_receivers_log: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EngineView> {
        self.tx.subscribe()
    }
}

impl PresentationSink for BroadcastSink {
    fn publish(&self, view: &EngineView) {
        if self.tx.send(view.clone()).is_ok() {
            return;
        }
        let Ok(mut last) = self.last_no_receivers_log.lock() else {
            return;
        };
        if last.is_none_or(|t| t.elapsed() >= NO_RECEIVERS_LOG_INTERVAL) {
            tracing::debug!(
                operation = "broadcast_view",
                "No active WebSocket clients; broadcast channel has no receivers"
            );
            *last = Some(Instant::now());
        }
    }
}

/// Textual activity log: one debug line per tick.
pub struct LogSink;

impl PresentationSink for LogSink {
    fn publish(&self, view: &EngineView) {
        match (&view.status, &view.current) {
            (SamplingStatus::Ok, Some(s)) => tracing::debug!(
                cpu_percent = s.cpu_percent,
                memory_percent = s.memory_percent,
                disk_percent = s.disk_percent,
                sent_bytes_per_sec = s.network_sent_rate_bytes_per_sec,
                recv_bytes_per_sec = s.network_recv_rate_bytes_per_sec,
                processes = s.process_count,
                active_alerts = view.active_alerts.len(),
                "tick"
            ),
            (status, _) => tracing::debug!(status = ?status, "tick"),
        }
    }
}

impl PresentationSink for Vec<Arc<dyn PresentationSink>> {
    fn publish(&self, view: &EngineView) {
        for sink in self {
            sink.publish(view);
        }
    }
}

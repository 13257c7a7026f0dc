// Read-only engine view handed to presentation sinks

use serde::{Deserialize, Serialize};

use super::{AlertEvent, Snapshot};
use crate::thresholds::ThresholdSet;

/// Outcome of the most recent round, surfaced to the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SamplingStatus {
    /// No round has completed yet.
    Starting,
    Ok,
    SourceUnavailable { message: String },
    Paused,
}

/// Average and peak of one series over the retained history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSummary {
    pub average: f64,
    pub peak: f64,
}

impl SeriesSummary {
    pub fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut peak = f64::MIN;
        for v in values {
            count += 1;
            sum += v;
            peak = peak.max(v);
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            average: sum / count as f64,
            peak,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub samples: usize,
    pub cpu: SeriesSummary,
    pub memory: SeriesSummary,
    pub disk: SeriesSummary,
    pub network_sent_rate: SeriesSummary,
    pub network_recv_rate: SeriesSummary,
    pub latest_process_count: u32,
}

/// Consistent copy of engine state, taken under the engine lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineView {
    pub status: SamplingStatus,
    pub paused: bool,
    pub interval_ms: u64,
    pub current: Option<Snapshot>,
    pub history: Vec<Snapshot>,
    pub history_capacity: usize,
    /// Newest first.
    pub active_alerts: Vec<AlertEvent>,
    pub alert_total: usize,
    pub thresholds: ThresholdSet,
    pub show_network_sent: bool,
    pub show_network_recv: bool,
    pub last_config_error: Option<String>,
    pub summary: Option<HistorySummary>,
}

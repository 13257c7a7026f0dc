// Raw readings from a metric source and the immutable per-round snapshot built from them

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// One round of OS readings, before rate derivation.
/// `taken_at` is monotonic and only used for elapsed-time math; `timestamp` is wall clock (ms since epoch).
#[derive(Debug, Clone)]
pub struct RawSample {
    pub timestamp: u64,
    pub taken_at: Instant,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub process_count: u32,
    pub net_sent_bytes: u64,
    pub net_recv_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub timestamp: u64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub process_count: u32,
    pub network_sent_cumulative_bytes: u64,
    pub network_recv_cumulative_bytes: u64,
    pub network_sent_rate_bytes_per_sec: f64,
    pub network_recv_rate_bytes_per_sec: f64,
    /// False on the first sample of a run, where both rates are reported as 0.
    pub rate_is_meaningful: bool,
}

// Threshold evaluation: strict `value > limit`, per metric, every round (no hysteresis)

use crate::models::{AlertEvent, AlertMetric, Metric, Snapshot};
use crate::thresholds::ThresholdSet;

/// Alerts for one snapshot in fixed order: cpu, memory, disk, network-sent,
/// network-recv, process. Network limits apply to the derived rates, never to
/// the cumulative counters.
pub fn evaluate(snapshot: &Snapshot, thresholds: &ThresholdSet) -> Vec<AlertEvent> {
    let readings = [
        (AlertMetric::Cpu, snapshot.cpu_percent),
        (AlertMetric::Memory, snapshot.memory_percent),
        (AlertMetric::Disk, snapshot.disk_percent),
        (
            AlertMetric::NetworkSent,
            snapshot.network_sent_rate_bytes_per_sec,
        ),
        (
            AlertMetric::NetworkRecv,
            snapshot.network_recv_rate_bytes_per_sec,
        ),
        (AlertMetric::Process, snapshot.process_count as f64),
    ];

    readings
        .into_iter()
        .filter_map(|(metric, value)| {
            let limit = thresholds.get(metric.threshold_metric());
            (value > limit).then(|| AlertEvent {
                timestamp: snapshot.timestamp,
                metric,
                message: alert_message(metric, value, limit),
                value,
                threshold: limit,
            })
        })
        .collect()
}

fn alert_message(metric: AlertMetric, value: f64, limit: f64) -> String {
    match metric.threshold_metric() {
        Metric::Cpu | Metric::Memory | Metric::Disk => format!(
            "{} at {:.1}% (threshold: {:.1}%)",
            metric.label(),
            value,
            limit
        ),
        Metric::Network => format!(
            "{} at {:.2} MB/s (threshold: {:.2} MB/s)",
            metric.label(),
            value / 1_000_000.0,
            limit / 1_000_000.0
        ),
        Metric::Process => format!("{} at {} (threshold: {})", metric.label(), value, limit),
    }
}

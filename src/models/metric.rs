// Metric names: threshold keys and alert subjects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// A thresholded metric. `Network` covers both directions and is compared against rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Cpu,
    Memory,
    Disk,
    Network,
    Process,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Cpu,
        Metric::Memory,
        Metric::Disk,
        Metric::Network,
        Metric::Process,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Memory => "memory",
            Metric::Disk => "disk",
            Metric::Network => "network",
            Metric::Process => "process",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cpu" => Ok(Metric::Cpu),
            "memory" | "mem" | "ram" => Ok(Metric::Memory),
            "disk" => Ok(Metric::Disk),
            "network" | "net" => Ok(Metric::Network),
            "process" | "processes" => Ok(Metric::Process),
            other => Err(EngineError::invalid(format!("unknown metric {:?}", other))),
        }
    }
}

/// Subject of an alert. Network splits by direction; order here is the emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertMetric {
    Cpu,
    Memory,
    Disk,
    NetworkSent,
    NetworkRecv,
    Process,
}

impl AlertMetric {
    /// Threshold that governs this alert subject.
    pub fn threshold_metric(self) -> Metric {
        match self {
            AlertMetric::Cpu => Metric::Cpu,
            AlertMetric::Memory => Metric::Memory,
            AlertMetric::Disk => Metric::Disk,
            AlertMetric::NetworkSent | AlertMetric::NetworkRecv => Metric::Network,
            AlertMetric::Process => Metric::Process,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertMetric::Cpu => "CPU usage",
            AlertMetric::Memory => "Memory usage",
            AlertMetric::Disk => "Disk usage",
            AlertMetric::NetworkSent => "Network send rate",
            AlertMetric::NetworkRecv => "Network receive rate",
            AlertMetric::Process => "Process count",
        }
    }
}

impl fmt::Display for AlertMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AlertMetric::Cpu => "cpu",
            AlertMetric::Memory => "memory",
            AlertMetric::Disk => "disk",
            AlertMetric::NetworkSent => "network-sent",
            AlertMetric::NetworkRecv => "network-recv",
            AlertMetric::Process => "process",
        };
        f.write_str(s)
    }
}

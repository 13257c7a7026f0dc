// Per-metric alert limits with validated runtime updates

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::Metric;

pub const DEFAULT_CPU_PERCENT: f64 = 80.0;
pub const DEFAULT_MEMORY_PERCENT: f64 = 80.0;
pub const DEFAULT_DISK_PERCENT: f64 = 80.0;
/// Bytes per second, applied to each network direction separately.
pub const DEFAULT_NETWORK_BYTES_PER_SEC: f64 = 1_000_000.0;
pub const DEFAULT_PROCESS_COUNT: f64 = 200.0;

/// Limits are always finite and > 0. Percent metrics are not capped at 100 so a
/// threshold of e.g. 150 simply never fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSet {
    cpu: f64,
    memory: f64,
    disk: f64,
    network: f64,
    process: f64,
}

impl Default for ThresholdSet {
    fn default() -> Self {
        Self {
            cpu: DEFAULT_CPU_PERCENT,
            memory: DEFAULT_MEMORY_PERCENT,
            disk: DEFAULT_DISK_PERCENT,
            network: DEFAULT_NETWORK_BYTES_PER_SEC,
            process: DEFAULT_PROCESS_COUNT,
        }
    }
}

impl ThresholdSet {
    /// Build from explicit values; any invalid limit rejects the whole set.
    pub fn new(cpu: f64, memory: f64, disk: f64, network: f64, process: f64) -> EngineResult<Self> {
        let mut set = Self::default();
        set.set(Metric::Cpu, cpu)?;
        set.set(Metric::Memory, memory)?;
        set.set(Metric::Disk, disk)?;
        set.set(Metric::Network, network)?;
        set.set(Metric::Process, process)?;
        Ok(set)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Cpu => self.cpu,
            Metric::Memory => self.memory,
            Metric::Disk => self.disk,
            Metric::Network => self.network,
            Metric::Process => self.process,
        }
    }

    /// Replace one limit. On error the previous value is left in place.
    pub fn set(&mut self, metric: Metric, value: f64) -> EngineResult<()> {
        validate_limit(metric, value)?;
        let slot = match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Memory => &mut self.memory,
            Metric::Disk => &mut self.disk,
            Metric::Network => &mut self.network,
            Metric::Process => &mut self.process,
        };
        *slot = value;
        Ok(())
    }

    /// Parse free-form text (e.g. from a text box) and apply it.
    pub fn set_from_str(&mut self, metric: Metric, input: &str) -> EngineResult<()> {
        let value = parse_limit(metric, input)?;
        self.set(metric, value)
    }
}

pub fn parse_limit(metric: Metric, input: &str) -> EngineResult<f64> {
    input.trim().parse::<f64>().map_err(|_| {
        EngineError::invalid(format!(
            "threshold for {} must be numeric, got {:?}",
            metric, input
        ))
    })
}

fn validate_limit(metric: Metric, value: f64) -> EngineResult<()> {
    if !value.is_finite() {
        return Err(EngineError::invalid(format!(
            "threshold for {} must be finite, got {}",
            metric, value
        )));
    }
    if value <= 0.0 {
        return Err(EngineError::invalid(format!(
            "threshold for {} must be > 0, got {}",
            metric, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_dashboard_defaults() {
        let t = ThresholdSet::default();
        assert_eq!(t.get(Metric::Cpu), 80.0);
        assert_eq!(t.get(Metric::Memory), 80.0);
        assert_eq!(t.get(Metric::Disk), 80.0);
        assert_eq!(t.get(Metric::Network), 1_000_000.0);
        assert_eq!(t.get(Metric::Process), 200.0);
    }

    #[test]
    fn non_numeric_input_keeps_prior_value() {
        let mut t = ThresholdSet::default();
        t.set(Metric::Cpu, 70.0).unwrap();
        let err = t.set_from_str(Metric::Cpu, "abc").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        assert_eq!(t.get(Metric::Cpu), 70.0);
    }

    #[test]
    fn zero_negative_and_nan_are_rejected() {
        let mut t = ThresholdSet::default();
        assert!(t.set(Metric::Disk, 0.0).is_err());
        assert!(t.set(Metric::Disk, -5.0).is_err());
        assert!(t.set(Metric::Disk, f64::NAN).is_err());
        assert!(t.set_from_str(Metric::Disk, "inf").is_err());
        assert_eq!(t.get(Metric::Disk), DEFAULT_DISK_PERCENT);
    }

    #[test]
    fn textual_input_is_trimmed() {
        let mut t = ThresholdSet::default();
        t.set_from_str(Metric::Process, " 350 ").unwrap();
        assert_eq!(t.get(Metric::Process), 350.0);
    }

    #[test]
    fn new_rejects_any_invalid_limit() {
        assert!(ThresholdSet::new(80.0, 80.0, 80.0, 0.0, 200.0).is_err());
        let t = ThresholdSet::new(90.0, 85.0, 70.0, 2048.0, 10.0).unwrap();
        assert_eq!(t.get(Metric::Network), 2048.0);
    }
}

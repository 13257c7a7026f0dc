// Fixed-capacity rolling history of snapshots (strict FIFO eviction)

use std::collections::VecDeque;

use crate::error::{EngineError, EngineResult};
use crate::models::{HistorySummary, SeriesSummary, Snapshot};

pub const DEFAULT_HISTORY_CAPACITY: usize = 15;
pub const MAX_HISTORY_CAPACITY: usize = 3600;

/// Chronological ring of snapshots. `len() <= capacity()` always holds and the
/// contents are the last `capacity` appended snapshots in insertion order.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    capacity: usize,
    entries: VecDeque<Snapshot>,
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            entries: VecDeque::with_capacity(DEFAULT_HISTORY_CAPACITY),
        }
    }
}

impl HistoryBuffer {
    pub fn with_capacity(capacity: usize) -> EngineResult<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        })
    }

    pub fn append(&mut self, snapshot: Snapshot) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(snapshot);
    }

    /// Last `n` snapshots, oldest first.
    pub fn tail(&self, n: usize) -> Vec<Snapshot> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.entries.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking drops the oldest excess entries immediately.
    pub fn set_capacity(&mut self, capacity: usize) -> EngineResult<()> {
        validate_capacity(capacity)?;
        self.capacity = capacity;
        let excess = self.entries.len().saturating_sub(capacity);
        self.entries.drain(..excess);
        Ok(())
    }

    pub fn summary(&self) -> Option<HistorySummary> {
        let latest = self.latest()?;
        Some(HistorySummary {
            samples: self.len(),
            cpu: SeriesSummary::from_values(self.iter().map(|s| s.cpu_percent))?,
            memory: SeriesSummary::from_values(self.iter().map(|s| s.memory_percent))?,
            disk: SeriesSummary::from_values(self.iter().map(|s| s.disk_percent))?,
            network_sent_rate: SeriesSummary::from_values(
                self.iter().map(|s| s.network_sent_rate_bytes_per_sec),
            )?,
            network_recv_rate: SeriesSummary::from_values(
                self.iter().map(|s| s.network_recv_rate_bytes_per_sec),
            )?,
            latest_process_count: latest.process_count,
        })
    }
}

fn validate_capacity(capacity: usize) -> EngineResult<()> {
    if capacity == 0 || capacity > MAX_HISTORY_CAPACITY {
        return Err(EngineError::invalid(format!(
            "history capacity must be between 1 and {}, got {}",
            MAX_HISTORY_CAPACITY, capacity
        )));
    }
    Ok(())
}

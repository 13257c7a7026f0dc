// Unbounded alert log plus the capped "active" view shown to the sink

use std::collections::VecDeque;

use crate::models::AlertEvent;

pub const ACTIVE_ALERTS_CAPACITY: usize = 8;

/// The full log lives for the whole run. The active view keeps the newest
/// `ACTIVE_ALERTS_CAPACITY` events and is only replaced by newer events or an
/// explicit `clear_active`.
#[derive(Debug, Clone)]
pub struct AlertLog {
    log: Vec<AlertEvent>,
    active: VecDeque<AlertEvent>,
    active_capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_active_capacity(ACTIVE_ALERTS_CAPACITY)
    }
}

impl AlertLog {
    pub fn with_active_capacity(active_capacity: usize) -> Self {
        let active_capacity = active_capacity.max(1);
        Self {
            log: Vec::new(),
            active: VecDeque::with_capacity(active_capacity),
            active_capacity,
        }
    }

    pub fn record(&mut self, events: &[AlertEvent]) {
        for event in events {
            self.log.push(event.clone());
            if self.active.len() >= self.active_capacity {
                self.active.pop_front();
            }
            self.active.push_back(event.clone());
        }
    }

    /// Active alerts, newest first.
    pub fn active(&self) -> Vec<AlertEvent> {
        self.active.iter().rev().cloned().collect()
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn clear_active(&mut self) {
        self.active.clear();
    }

    /// Every recorded alert, oldest first.
    pub fn history(&self) -> &[AlertEvent] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlertMetric;

    fn event(ts: u64) -> AlertEvent {
        AlertEvent {
            timestamp: ts,
            metric: AlertMetric::Cpu,
            message: format!("alert {}", ts),
            value: 90.0,
            threshold: 80.0,
        }
    }

    #[test]
    fn active_view_is_capped_and_newest_first() {
        let mut log = AlertLog::default();
        let events: Vec<AlertEvent> = (0..12).map(event).collect();
        log.record(&events);

        assert_eq!(log.len(), 12);
        assert_eq!(log.active_len(), ACTIVE_ALERTS_CAPACITY);
        let ts: Vec<u64> = log.active().iter().map(|e| e.timestamp).collect();
        assert_eq!(ts, vec![11, 10, 9, 8, 7, 6, 5, 4]);
    }

    #[test]
    fn clear_active_keeps_full_log() {
        let mut log = AlertLog::default();
        log.record(&[event(1), event(2)]);
        log.clear_active();
        assert_eq!(log.active_len(), 0);
        assert_eq!(log.history().len(), 2);
    }

    #[test]
    fn empty_record_is_a_no_op() {
        let mut log = AlertLog::default();
        log.record(&[]);
        assert!(log.is_empty());
        assert!(log.active().is_empty());
    }
}

// Cumulative counter -> bytes/sec conversion

use std::time::{Duration, Instant};

/// Lower bound on elapsed time so back-to-back samples never divide by ~0.
pub const MIN_ELAPSED: Duration = Duration::from_millis(1);

/// Bytes/sec between two readings of a monotonic counter.
/// A decrease (interface reset, counter wrap) counts as no traffic, never a negative rate.
pub fn rate(prev_cumulative: u64, prev_time: Instant, curr_cumulative: u64, curr_time: Instant) -> f64 {
    bytes_per_sec(
        prev_cumulative,
        curr_cumulative,
        curr_time.saturating_duration_since(prev_time),
    )
}

pub fn bytes_per_sec(prev_cumulative: u64, curr_cumulative: u64, elapsed: Duration) -> f64 {
    let delta = curr_cumulative.saturating_sub(prev_cumulative);
    delta as f64 / elapsed.max(MIN_ELAPSED).as_secs_f64()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetworkRate {
    pub sent_bytes_per_sec: f64,
    pub recv_bytes_per_sec: f64,
    /// False when there was no previous reading to diff against.
    pub meaningful: bool,
}

impl NetworkRate {
    pub const NOT_YET_MEANINGFUL: NetworkRate = NetworkRate {
        sent_bytes_per_sec: 0.0,
        recv_bytes_per_sec: 0.0,
        meaningful: false,
    };
}

#[derive(Debug, Clone, Copy)]
struct CounterReading {
    sent: u64,
    recv: u64,
    at: Instant,
}

/// Keeps the last good counter reading and derives rates from consecutive readings.
#[derive(Debug, Clone, Default)]
pub struct RateComputer {
    previous: Option<CounterReading>,
}

impl RateComputer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current cumulative counters; returns the rate against the previous reading.
    pub fn observe(&mut self, sent: u64, recv: u64, at: Instant) -> NetworkRate {
        let current = CounterReading { sent, recv, at };
        let result = match self.previous {
            Some(prev) => NetworkRate {
                sent_bytes_per_sec: rate(prev.sent, prev.at, sent, at),
                recv_bytes_per_sec: rate(prev.recv, prev.at, recv, at),
                meaningful: true,
            },
            None => NetworkRate::NOT_YET_MEANINGFUL,
        };
        self.previous = Some(current);
        result
    }

    pub fn has_baseline(&self) -> bool {
        self.previous.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_over_one_second() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(rate(100, t0, 150, t1), 50.0);
    }

    #[test]
    fn counter_reset_gives_zero_not_negative() {
        let t0 = Instant::now();
        let t1 = t0 + Duration::from_secs(1);
        assert_eq!(rate(150, t0, 100, t1), 0.0);
    }

    #[test]
    fn zero_elapsed_is_clamped() {
        let t0 = Instant::now();
        let r = rate(0, t0, 10, t0);
        assert!(r.is_finite());
        assert_eq!(r, 10.0 / MIN_ELAPSED.as_secs_f64());
    }

    #[test]
    fn first_observation_is_not_meaningful() {
        let mut rc = RateComputer::new();
        let t0 = Instant::now();
        let first = rc.observe(1_000, 2_000, t0);
        assert_eq!(first, NetworkRate::NOT_YET_MEANINGFUL);
        assert!(rc.has_baseline());

        let second = rc.observe(3_000, 2_500, t0 + Duration::from_secs(2));
        assert!(second.meaningful);
        assert_eq!(second.sent_bytes_per_sec, 1_000.0);
        assert_eq!(second.recv_bytes_per_sec, 250.0);
    }

    #[test]
    fn each_direction_handles_reset_independently() {
        let mut rc = RateComputer::new();
        let t0 = Instant::now();
        rc.observe(500, 500, t0);
        let r = rc.observe(100, 900, t0 + Duration::from_secs(1));
        assert_eq!(r.sent_bytes_per_sec, 0.0);
        assert_eq!(r.recv_bytes_per_sec, 400.0);
    }
}

// Host metric readings via sysinfo

mod linux;

use crate::error::{EngineError, EngineResult};
use crate::models::RawSample;
use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use sysinfo::{Disks, Networks, ProcessesToUpdate, System};
use tracing::instrument;

pub const DEFAULT_CPU_WINDOW: Duration = Duration::from_millis(500);

/// One blocking read of every metric the engine needs. Implementations may
/// block (the CPU reading spans a short window); callers run them off the
/// async executor and outside the engine lock.
pub trait MetricSource: Send + Sync {
    fn sample(&self) -> EngineResult<RawSample>;
}

/// Wall-clock ms since the Unix epoch; 0 (with a warning) if the clock is before 1970.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(
                error = %e,
                operation = "get_timestamp",
                "system time error"
            );
            0
        })
}

pub struct SysinfoSource {
    sys: Mutex<System>,
    disks: Mutex<Disks>,
    networks: Mutex<Networks>,
    cpu_window: Duration,
}

impl Default for SysinfoSource {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_WINDOW)
    }
}

impl SysinfoSource {
    pub fn new(cpu_window: Duration) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        let disks = Disks::new_with_refreshed_list();
        let networks = Networks::new_with_refreshed_list();
        Self {
            sys: Mutex::new(sys),
            disks: Mutex::new(disks),
            networks: Mutex::new(networks),
            cpu_window: cpu_window.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL),
        }
    }

    /// Global CPU usage measured across `cpu_window`.
    fn cpu_percent(&self) -> EngineResult<f64> {
        let mut sys = self
            .sys
            .lock()
            .map_err(|e| EngineError::source_unavailable("cpu", format!("lock poisoned: {}", e)))?;
        sys.refresh_cpu_all();
        std::thread::sleep(self.cpu_window);
        sys.refresh_cpu_all();
        if sys.cpus().is_empty() {
            return Err(EngineError::source_unavailable("cpu", "no CPUs reported"));
        }
        Ok((sys.global_cpu_usage() as f64).clamp(0.0, 100.0))
    }

    fn memory_percent(&self) -> EngineResult<f64> {
        let mut sys = self.sys.lock().map_err(|e| {
            EngineError::source_unavailable("memory", format!("lock poisoned: {}", e))
        })?;
        sys.refresh_memory();
        let total = sys.total_memory();
        if total == 0 {
            return Err(EngineError::source_unavailable(
                "memory",
                "total memory reported as 0",
            ));
        }
        let used = total.saturating_sub(sys.available_memory());
        Ok(percent(used, total))
    }

    /// Usage of the root filesystem; falls back to the sum over real disks.
    fn disk_percent(&self) -> EngineResult<f64> {
        let mut disks = self.disks.lock().map_err(|e| {
            EngineError::source_unavailable("disk", format!("lock poisoned: {}", e))
        })?;
        disks.refresh(true);
        let root = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == Path::new("/"));
        let (total, available) = match root {
            Some(d) => (d.total_space(), d.available_space()),
            None => disks
                .list()
                .iter()
                .filter(|d| !linux::is_pseudo_fs(&d.file_system().to_string_lossy()))
                .fold((0u64, 0u64), |(t, a), d| {
                    (
                        t.saturating_add(d.total_space()),
                        a.saturating_add(d.available_space()),
                    )
                }),
        };
        if total == 0 {
            return Err(EngineError::source_unavailable("disk", "no disks reported"));
        }
        Ok(percent(total.saturating_sub(available), total))
    }

    fn process_count(&self) -> EngineResult<u32> {
        if let Some(n) = linux::count_processes_linux() {
            return Ok(n);
        }
        let mut sys = self.sys.lock().map_err(|e| {
            EngineError::source_unavailable("process", format!("lock poisoned: {}", e))
        })?;
        sys.refresh_processes(ProcessesToUpdate::All, true);
        Ok(sys.processes().len().min(u32::MAX as usize) as u32)
    }

    /// Cumulative (sent, received) bytes over all interfaces since boot.
    fn network_totals(&self) -> EngineResult<(u64, u64)> {
        let mut networks = self.networks.lock().map_err(|e| {
            EngineError::source_unavailable("network", format!("lock poisoned: {}", e))
        })?;
        networks.refresh(true);
        Ok(networks
            .list()
            .values()
            .fold((0u64, 0u64), |(sent, recv), data| {
                (
                    sent.saturating_add(data.total_transmitted()),
                    recv.saturating_add(data.total_received()),
                )
            }))
    }
}

impl MetricSource for SysinfoSource {
    #[instrument(skip(self), fields(source = "sysinfo", operation = "sample"))]
    fn sample(&self) -> EngineResult<RawSample> {
        let cpu_percent = self.cpu_percent()?;
        let memory_percent = self.memory_percent()?;
        let disk_percent = self.disk_percent()?;
        let process_count = self.process_count()?;
        let (net_sent_bytes, net_recv_bytes) = self.network_totals()?;
        Ok(RawSample {
            timestamp: now_millis(),
            taken_at: Instant::now(),
            cpu_percent,
            memory_percent,
            disk_percent,
            process_count,
            net_sent_bytes,
            net_recv_bytes,
        })
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    ((used as f64 / total as f64) * 100.0).clamp(0.0, 100.0)
}

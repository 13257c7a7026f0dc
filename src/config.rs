use serde::Deserialize;

use crate::engine::EngineSettings;
use crate::history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use crate::scheduler::{DEFAULT_INTERVAL_MS, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use crate::thresholds::{self, ThresholdSet};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub publishing: PublishingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    8085
}

fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    /// Blocking window used to measure CPU usage each round.
    #[serde(default = "default_cpu_window_ms")]
    pub cpu_window_ms: u64,
    /// How often to log app stats (ticks, skipped rounds, alert total) at INFO level.
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

fn default_cpu_window_ms() -> u64 {
    500
}

fn default_stats_log_interval_secs() -> u64 {
    60
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            history_capacity: default_history_capacity(),
            cpu_window_ms: default_cpu_window_ms(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_cpu")]
    pub cpu: f64,
    #[serde(default = "default_memory")]
    pub memory: f64,
    #[serde(default = "default_disk")]
    pub disk: f64,
    /// Bytes/sec per direction.
    #[serde(default = "default_network")]
    pub network: f64,
    #[serde(default = "default_process")]
    pub process: f64,
}

fn default_cpu() -> f64 {
    thresholds::DEFAULT_CPU_PERCENT
}

fn default_memory() -> f64 {
    thresholds::DEFAULT_MEMORY_PERCENT
}

fn default_disk() -> f64 {
    thresholds::DEFAULT_DISK_PERCENT
}

fn default_network() -> f64 {
    thresholds::DEFAULT_NETWORK_BYTES_PER_SEC
}

fn default_process() -> f64 {
    thresholds::DEFAULT_PROCESS_COUNT
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu: default_cpu(),
            memory: default_memory(),
            disk: default_disk(),
            network: default_network(),
            process: default_process(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// Max number of views kept in the broadcast channel for /ws/state (slow clients may lag).
    #[serde(default = "default_broadcast_capacity")]
    pub broadcast_capacity: usize,
}

fn default_broadcast_capacity() -> usize {
    16
}

impl Default for PublishingConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: default_broadcast_capacity(),
        }
    }
}

impl AppConfig {
    /// Load from `$CONFIG_FILE` (default `config.toml`). A missing file means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(s) => Self::load_from_str(&s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path, "config file not found; using defaults");
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
            Err(e) => Err(anyhow::anyhow!("reading {}: {}", path, e)),
        }
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            (MIN_INTERVAL_MS..=MAX_INTERVAL_MS).contains(&self.sampling.interval_ms),
            "sampling.interval_ms must be between {} and {}, got {}",
            MIN_INTERVAL_MS,
            MAX_INTERVAL_MS,
            self.sampling.interval_ms
        );
        anyhow::ensure!(
            (1..=MAX_HISTORY_CAPACITY).contains(&self.sampling.history_capacity),
            "sampling.history_capacity must be between 1 and {}, got {}",
            MAX_HISTORY_CAPACITY,
            self.sampling.history_capacity
        );
        anyhow::ensure!(
            (100..=5000).contains(&self.sampling.cpu_window_ms),
            "sampling.cpu_window_ms must be between 100 and 5000, got {}",
            self.sampling.cpu_window_ms
        );
        anyhow::ensure!(
            self.sampling.cpu_window_ms < self.sampling.interval_ms,
            "sampling.cpu_window_ms ({}) must be shorter than sampling.interval_ms ({})",
            self.sampling.cpu_window_ms,
            self.sampling.interval_ms
        );
        anyhow::ensure!(
            self.sampling.stats_log_interval_secs > 0,
            "sampling.stats_log_interval_secs must be > 0, got {}",
            self.sampling.stats_log_interval_secs
        );
        self.threshold_set()
            .map_err(|e| anyhow::anyhow!("thresholds: {}", e))?;
        anyhow::ensure!(
            self.publishing.broadcast_capacity > 0,
            "publishing.broadcast_capacity must be > 0, got {}",
            self.publishing.broadcast_capacity
        );
        Ok(())
    }

    pub fn threshold_set(&self) -> crate::error::EngineResult<ThresholdSet> {
        let t = &self.thresholds;
        ThresholdSet::new(t.cpu, t.memory, t.disk, t.network, t.process)
    }

    /// Engine startup values. Invalid thresholds fall back to defaults (already rejected by `validate`).
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            interval_ms: self.sampling.interval_ms,
            history_capacity: self.sampling.history_capacity,
            thresholds: self.threshold_set().unwrap_or_default(),
            ..EngineSettings::default()
        }
    }
}

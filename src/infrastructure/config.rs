use crate::domain::sample::COUNTER_FIELD;
use serde::Deserialize;
use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub sampler: SamplerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SamplerSettings {
    #[serde(default = "default_source_url")]
    pub source_url: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_window_size")]
    pub window_size: usize,
    #[serde(default = "default_series_names")]
    pub series_names: Vec<String>,
    #[serde(default = "default_stale_after_failures")]
    pub stale_after_failures: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sampler.interval_ms must be greater than zero")]
    ZeroInterval,
    #[error("sampler.window_size must be greater than zero")]
    ZeroWindow,
    #[error("sampler.series_names must not be empty")]
    NoSeries,
    #[error("series '{0}' is configured more than once")]
    DuplicateSeries(String),
    #[error("'{0}' is the counter field and cannot be charted as a series")]
    ReservedSeries(String),
    #[error("invalid listen address {0}")]
    InvalidAddress(String),
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_source_url() -> String {
    "http://127.0.0.1:3001/metrics".to_string()
}

fn default_interval_ms() -> u64 {
    10_000
}

fn default_request_timeout_ms() -> u64 {
    5_000
}

fn default_window_size() -> usize {
    10
}

fn default_series_names() -> Vec<String> {
    vec![
        "cpuUsage".to_string(),
        "latency".to_string(),
        "memoryUsage".to_string(),
    ]
}

fn default_stale_after_failures() -> u32 {
    3
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            interval_ms: default_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            window_size: default_window_size(),
            series_names: default_series_names(),
            stale_after_failures: default_stale_after_failures(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(format!("{}:{}", self.host, self.port)))
    }
}

impl SamplerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sampler = &self.sampler;
        if sampler.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if sampler.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if sampler.series_names.is_empty() {
            return Err(ConfigError::NoSeries);
        }

        let mut seen = HashSet::new();
        for name in &sampler.series_names {
            if name == COUNTER_FIELD {
                return Err(ConfigError::ReservedSeries(name.clone()));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateSeries(name.clone()));
            }
        }

        self.server.socket_addr()?;
        Ok(())
    }
}

/// Load `config/dashboard.*` (optional) overlaid with `DASHBOARD_*` env vars,
/// e.g. `DASHBOARD_SAMPLER__INTERVAL_MS=2000`.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("sampler.series_names"),
        )
        .build()?;

    let dashboard: DashboardConfig = settings.try_deserialize()?;
    dashboard.validate()?;
    Ok(dashboard)
}

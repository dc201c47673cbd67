use crate::scheduler::SchedulePolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub deletion: DeletionConfig,

    #[serde(default)]
    pub processes: ProcessConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Delay before the next run after a fully successful battery
    #[serde(default = "default_success_interval_hours")]
    pub success_interval_hours: u64,

    /// Delay before the next run after any task failed
    #[serde(default = "default_retry_interval_hours")]
    pub retry_interval_hours: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionConfig {
    #[serde(default = "default_lock_retry_delay_ms")]
    pub lock_retry_delay_ms: u64,

    #[serde(default = "default_max_lock_retries")]
    pub max_lock_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Upper bound for quick tools (ipconfig, wevtutil). 0 waits forever.
    #[serde(default = "default_process_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound for the file-integrity scan. 0 waits forever.
    #[serde(default = "default_integrity_timeout_secs")]
    pub integrity_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Folder for the log files; defaults to Documents\CleanupWindowsService
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Default filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            success_interval_hours: default_success_interval_hours(),
            retry_interval_hours: default_retry_interval_hours(),
        }
    }
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self {
            lock_retry_delay_ms: default_lock_retry_delay_ms(),
            max_lock_retries: default_max_lock_retries(),
        }
    }
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_process_timeout_secs(),
            integrity_timeout_secs: default_integrity_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: None,
            level: default_log_level(),
        }
    }
}

fn default_success_interval_hours() -> u64 { 24 }
fn default_retry_interval_hours() -> u64 { 1 }
fn default_lock_retry_delay_ms() -> u64 { 500 }
fn default_max_lock_retries() -> u32 { 1 }
fn default_process_timeout_secs() -> u64 { 300 }
fn default_integrity_timeout_secs() -> u64 { 4 * 60 * 60 }
fn default_log_level() -> String { "info".to_string() }

impl Config {
    /// Get the config file path: %ProgramData%\cleanupd\config.toml
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("ProgramData")
            .map(PathBuf::from)
            .or_else(|| directories::BaseDirs::new().map(|d| d.config_dir().to_path_buf()))
            .map(|dir| dir.join("cleanupd").join("config.toml"))
    }

    /// Load the config from `path`, or from [`Config::default_path`].
    ///
    /// A missing file means defaults. A file that exists but cannot be read
    /// or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) if path.exists() => path,
            _ => return Ok(Self::default()),
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.schedule.success_interval_hours == 0 {
            return Err(ConfigError::Invalid(
                "schedule.success_interval_hours must be greater than zero".to_string(),
            ));
        }
        if self.schedule.retry_interval_hours == 0 {
            return Err(ConfigError::Invalid(
                "schedule.retry_interval_hours must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn schedule_policy(&self) -> SchedulePolicy {
        SchedulePolicy {
            success_interval: hours(self.schedule.success_interval_hours),
            retry_interval: hours(self.schedule.retry_interval_hours),
        }
    }
}

impl ProcessConfig {
    pub fn timeout(&self) -> Option<Duration> {
        non_zero_secs(self.timeout_secs)
    }

    pub fn integrity_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.integrity_timeout_secs)
    }
}

fn hours(value: u64) -> Duration {
    Duration::from_secs(value.saturating_mul(60 * 60))
}

fn non_zero_secs(value: u64) -> Option<Duration> {
    (value > 0).then(|| Duration::from_secs(value))
}

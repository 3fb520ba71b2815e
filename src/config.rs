use crate::domain::Entity;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_INTERVAL_SECS: f64 = 0.1;
pub const DEFAULT_CAPACITY: usize = 10_000;
pub const DEFAULT_SCALE: i64 = 30;
pub const DEFAULT_PERCENTILE: f64 = 90.0;
pub const DEFAULT_SYSFS_ROOT: &str = "/sys/block";

/// Scale is also the bar width in cells
pub const MAX_SCALE: i64 = 1_000;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("no devices to monitor")]
    NoEntities,
    #[error("sampling interval must be a positive number of seconds, got {0}")]
    InvalidInterval(f64),
    #[error("reservoir capacity must be positive")]
    InvalidCapacity,
    #[error("display scale must be within 1..={max}, got {0}", max = MAX_SCALE)]
    InvalidScale(i64),
    #[error("percentile must be within 0..=100, got {0}")]
    InvalidPercentile(f64),
}

/// Where the displayed "current" value comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DisplayRead {
    /// Show the value that was just fed to the sampler
    #[default]
    Recorded,
    /// Sample again after feeding, for the freshest number
    Fresh,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub entities: Vec<Entity>,
    pub interval_secs: f64,
    pub capacity: usize,
    pub scale: i64,
    pub percentile: f64,
    pub columns: Vec<f64>,
    pub aggregate: Option<String>,
    pub display_read: DisplayRead,
    pub batch: bool,
    pub sysfs_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            capacity: DEFAULT_CAPACITY,
            scale: DEFAULT_SCALE,
            percentile: DEFAULT_PERCENTILE,
            columns: Vec::new(),
            aggregate: None,
            display_read: DisplayRead::default(),
            batch: false,
            sysfs_root: PathBuf::from(DEFAULT_SYSFS_ROOT),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entities.is_empty() {
            return Err(ConfigError::NoEntities);
        }
        if self.interval_secs <= 0.0 || Duration::try_from_secs_f64(self.interval_secs).is_err() {
            return Err(ConfigError::InvalidInterval(self.interval_secs));
        }
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if !(1..=MAX_SCALE).contains(&self.scale) {
            return Err(ConfigError::InvalidScale(self.scale));
        }
        for &pct in std::iter::once(&self.percentile).chain(&self.columns) {
            if !(0.0..=100.0).contains(&pct) {
                return Err(ConfigError::InvalidPercentile(pct));
            }
        }
        Ok(())
    }

    /// Falls back to the default for values `validate()` would reject
    pub fn interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.interval_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_INTERVAL_SECS))
    }
}

use std::fmt;
use std::time::Instant;

/// Block device being monitored (e.g. "sdc", "nvme0n1")
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(String);

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Entity {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Per-row statistics handed to the renderer each tick
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceReport {
    pub label: String,
    pub size: Option<String>,  // Human capacity label, e.g. "4T"
    pub current: i64,
    pub percentile: i64,       // Nearest-rank value at the configured percentile
    pub columns: Vec<f64>,     // Interpolated extra percentile columns
    pub average: f64,
    pub utilization: f64,
    pub seen: u64,
    pub reservoir_fill: usize,
    pub scale: i64,            // Max-for-scale of this row
}

/// Everything a renderer needs for one tick
#[derive(Clone, Debug)]
pub struct TickReport {
    pub tick: u64,
    pub percentile: f64,
    pub bar_width: i64,
    pub columns: Vec<f64>,
    pub devices: Vec<DeviceReport>,
    pub aggregate: Option<DeviceReport>,
    pub timestamp: Instant,
}

impl TickReport {
    /// Observations offered to the first device's sampler
    pub fn total_samples(&self) -> u64 {
        self.devices.first().map(|d| d.seen).unwrap_or(0)
    }

    pub fn reservoir_fill(&self) -> usize {
        self.devices.first().map(|d| d.reservoir_fill).unwrap_or(0)
    }
}

pub mod block;
pub mod inflight;

pub use block::BlockDeviceCollector;
pub use inflight::InflightCollector;

use crate::domain::Entity;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CollectError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed record {0:?}")]
    Malformed(String),
    #[error("invalid counter: {0}")]
    Parse(#[from] std::num::ParseIntError),
}

/// Instantaneous metric per entity. Never fails: an unreadable value is 0.
pub trait MetricSource {
    fn sample(&self, entity: &Entity) -> i64;
}

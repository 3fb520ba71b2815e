use crate::collectors::{CollectError, MetricSource};
use crate::domain::Entity;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Reads `<root>/<device>/inflight` ("<reads> <writes>") and sums both counters.
///
/// The file is opened and closed on every read; sysfs entries come and go with
/// hotplug so no handle is kept between ticks.
pub struct InflightCollector {
    root: PathBuf,
}

impl InflightCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, entity: &Entity) -> PathBuf {
        self.root.join(entity.name()).join("inflight")
    }

    pub fn read(&self, entity: &Entity) -> Result<i64, CollectError> {
        let path = self.path_for(entity);
        let content = fs::read_to_string(&path).map_err(|source| CollectError::Io {
            path: path.clone(),
            source,
        })?;
        parse_inflight(&content)
    }
}

impl MetricSource for InflightCollector {
    fn sample(&self, entity: &Entity) -> i64 {
        self.read(entity).unwrap_or_else(|e| {
            debug!("{}: {}", entity, e);
            0
        })
    }
}

/// Sum of the first two whitespace-separated integers
pub fn parse_inflight(content: &str) -> Result<i64, CollectError> {
    let mut fields = content.split_whitespace();
    let (Some(reads), Some(writes)) = (fields.next(), fields.next()) else {
        return Err(CollectError::Malformed(content.trim().to_string()));
    };

    let reads: i64 = reads.parse()?;
    let writes: i64 = writes.parse()?;
    reads
        .checked_add(writes)
        .ok_or_else(|| CollectError::Malformed(content.trim().to_string()))
}

use crate::collectors::CollectError;
use crate::domain::Entity;
use log::{debug, warn};
use std::fs;
use std::path::PathBuf;

/// Virtual or stacked devices that never have a meaningful hardware queue
const SKIPPED_PREFIXES: &[&str] = &["loop", "ram", "zram", "dm-", "sr", "md"];

/// Sector size used by the sysfs `size` attribute regardless of the device
const SECTOR_BYTES: u64 = 512;

/// Resolves the set of monitored block devices once at startup and reads
/// their static attributes.
pub struct BlockDeviceCollector {
    root: PathBuf,
}

impl BlockDeviceCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// All physical-looking devices under the sysfs root, sorted by name
    pub fn discover(&self) -> Result<Vec<Entity>, CollectError> {
        let entries = fs::read_dir(&self.root).map_err(|source| CollectError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut devices: Vec<Entity> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !SKIPPED_PREFIXES.iter().any(|p| name.starts_with(p)))
            .map(Entity::new)
            .collect();
        devices.sort();

        debug!("Discovered {} block devices under {}", devices.len(), self.root.display());
        Ok(devices)
    }

    /// Keep only devices that exist under the root; warn about the rest
    pub fn resolve(&self, requested: &[Entity]) -> Vec<Entity> {
        requested
            .iter()
            .filter(|entity| {
                let exists = self.root.join(entity.name()).exists();
                if !exists {
                    warn!("Device {} not found under {}, skipping", entity, self.root.display());
                }
                exists
            })
            .cloned()
            .collect()
    }

    /// Human capacity label such as "4T" or "500G"; "?" if unreadable
    pub fn size_label(&self, entity: &Entity) -> String {
        let path = self.root.join(entity.name()).join("size");
        match fs::read_to_string(&path)
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
        {
            Some(sectors) => format_size(sectors.saturating_mul(SECTOR_BYTES)),
            None => {
                debug!("No size for {} at {}", entity, path.display());
                "?".to_string()
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    const GIB: f64 = 1024.0 * 1024.0 * 1024.0;
    const TIB: f64 = GIB * 1024.0;

    let bytes = bytes as f64;
    if bytes >= TIB {
        format!("{:.0}T", bytes / TIB)
    } else {
        format!("{:.0}G", bytes / GIB)
    }
}

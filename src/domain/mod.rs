pub mod device;
pub mod percentile;
pub mod reservoir;

pub use device::{DeviceReport, Entity, TickReport};
pub use percentile::{percentile, percentile_interpolated, percentiles_interpolated};
pub use reservoir::ReservoirSampler;

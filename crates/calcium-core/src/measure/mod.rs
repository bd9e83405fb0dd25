pub mod influx;
pub mod integrate;

pub use influx::{classify, classify_ratio, influx_ratio, InfluxBounds, InfluxClass, Rejection};
pub use integrate::{integrate_disk, integrate_peaks};

pub mod components;
pub mod config;
pub mod filters;
pub mod peaks;

pub use config::DetectionConfig;
pub use peaks::{locate_peaks, Peak};

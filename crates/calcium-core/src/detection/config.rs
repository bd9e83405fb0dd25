use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BORDER_MARGIN, DEFAULT_THRESHOLD};

/// Configuration for particle peak detection in a single frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Minimum local contrast (3x3 max minus 3x3 min) for a maximum to count.
    #[serde(default = "default_threshold")]
    pub threshold: u32,
    /// Peaks within this many pixels of an edge are discarded.
    #[serde(default = "default_border_margin")]
    pub border_margin: usize,
}

fn default_threshold() -> u32 {
    DEFAULT_THRESHOLD
}
fn default_border_margin() -> usize {
    DEFAULT_BORDER_MARGIN
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            border_margin: DEFAULT_BORDER_MARGIN,
        }
    }
}

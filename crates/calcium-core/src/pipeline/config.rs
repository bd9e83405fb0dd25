use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BORDER_MARGIN, DEFAULT_HIGH_BOUND, DEFAULT_LOW_BOUND, DEFAULT_RADIUS,
    DEFAULT_THRESHOLD, LARGE_RADIUS_WARNING, MAX_THRESHOLDS, SANE_THRESHOLD_RANGE,
};
use crate::detection::DetectionConfig;
use crate::error::{CalciumError, Result};
use crate::measure::InfluxBounds;

/// Run-wide analysis settings, fixed for the lifetime of a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Peak detection thresholds; each one produces an independent table.
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<u32>,
    /// Integration disk radius in pixels.
    #[serde(default = "default_radius")]
    pub radius: u32,
    /// Upper influx bound in percent.
    #[serde(default = "default_high")]
    pub high: i32,
    /// Lower influx bound in percent.
    #[serde(default = "default_low")]
    pub low: i32,
    /// Border exclusion for detected peaks, in pixels.
    #[serde(default = "default_border_margin")]
    pub border_margin: usize,
}

fn default_thresholds() -> Vec<u32> {
    vec![DEFAULT_THRESHOLD]
}
fn default_radius() -> u32 {
    DEFAULT_RADIUS
}
fn default_high() -> i32 {
    DEFAULT_HIGH_BOUND
}
fn default_low() -> i32 {
    DEFAULT_LOW_BOUND
}
fn default_border_margin() -> usize {
    DEFAULT_BORDER_MARGIN
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
            radius: DEFAULT_RADIUS,
            high: DEFAULT_HIGH_BOUND,
            low: DEFAULT_LOW_BOUND,
            border_margin: DEFAULT_BORDER_MARGIN,
        }
    }
}

/// Suspicious but accepted configuration values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigWarning {
    ThresholdOutOfRange(u32),
    DuplicateThreshold(u32),
    TooManyThresholds { given: usize, kept: usize },
    LargeRadius(u32),
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThresholdOutOfRange(t) => {
                write!(f, "{t} might be too small or too large for thresholding")
            }
            Self::DuplicateThreshold(t) => write!(f, "threshold {t} listed more than once"),
            Self::TooManyThresholds { given, kept } => {
                write!(f, "{given} thresholds given, only the first {kept} will be used")
            }
            Self::LargeRadius(r) => write!(f, "radius {r} might be too large"),
        }
    }
}

impl AnalysisConfig {
    pub fn bounds(&self) -> InfluxBounds {
        InfluxBounds {
            high: self.high,
            low: self.low,
        }
    }

    pub fn detection(&self, threshold: u32) -> DetectionConfig {
        DetectionConfig {
            threshold,
            border_margin: self.border_margin,
        }
    }

    /// Thresholds actually analysed: duplicates removed, first five kept.
    pub fn active_thresholds(&self) -> Vec<u32> {
        let mut seen = Vec::with_capacity(MAX_THRESHOLDS);
        for &t in &self.thresholds {
            if !seen.contains(&t) {
                seen.push(t);
            }
            if seen.len() == MAX_THRESHOLDS {
                break;
            }
        }
        seen
    }

    /// Reject unusable settings and list the questionable ones.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>> {
        if self.thresholds.is_empty() {
            return Err(CalciumError::InvalidConfig(
                "at least one threshold is required".into(),
            ));
        }
        if self.thresholds.contains(&0) {
            return Err(CalciumError::InvalidConfig(
                "thresholds must be positive".into(),
            ));
        }
        if self.low >= self.high {
            return Err(CalciumError::InvalidConfig(format!(
                "low bound {} must be below high bound {}",
                self.low, self.high
            )));
        }

        let mut warnings = Vec::new();
        let mut seen = Vec::new();
        for &t in &self.thresholds {
            if seen.contains(&t) {
                warnings.push(ConfigWarning::DuplicateThreshold(t));
                continue;
            }
            seen.push(t);
            if t < SANE_THRESHOLD_RANGE.0 || t > SANE_THRESHOLD_RANGE.1 {
                warnings.push(ConfigWarning::ThresholdOutOfRange(t));
            }
        }
        if seen.len() > MAX_THRESHOLDS {
            warnings.push(ConfigWarning::TooManyThresholds {
                given: seen.len(),
                kept: MAX_THRESHOLDS,
            });
        }
        if self.radius >= LARGE_RADIUS_WARNING {
            warnings.push(ConfigWarning::LargeRadius(self.radius));
        }
        Ok(warnings)
    }
}

/// Parse a threshold list such as `"80/100/120"`.
///
/// Commas are accepted as separators too. Non-numeric and non-positive terms
/// are dropped, duplicates removed in order, at most five kept. An empty
/// result falls back to the default threshold.
pub fn parse_threshold_list(input: &str) -> Vec<u32> {
    let mut thresholds: Vec<u32> = Vec::new();
    for term in input.split(['/', ',']) {
        let Ok(t) = term.trim().parse::<u32>() else {
            continue;
        };
        if t > 0 && !thresholds.contains(&t) {
            thresholds.push(t);
        }
    }
    thresholds.truncate(MAX_THRESHOLDS);
    if thresholds.is_empty() {
        thresholds.push(DEFAULT_THRESHOLD);
    }
    thresholds
}

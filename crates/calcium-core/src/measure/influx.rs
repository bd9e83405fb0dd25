use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HIGH_BOUND, DEFAULT_LOW_BOUND, FULL_INFLUX};

/// Acceptance window for raw influx ratios, in percent.
///
/// Ratios in `[100, high]` saturate to 100, ratios in `[low, 0]` floor to 0,
/// anything outside `[low, high]` is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfluxBounds {
    pub high: i32,
    pub low: i32,
}

impl Default for InfluxBounds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_BOUND,
            low: DEFAULT_LOW_BOUND,
        }
    }
}

/// Why a peak's measurement was dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rejection {
    /// Reference and blank intensities are equal; the ratio has no denominator.
    DegenerateReference,
    /// The ratio is NaN or infinite.
    NonFinite,
    /// The ratio fell below the low bound.
    BelowLow(f64),
    /// The ratio rose above the high bound.
    AboveHigh(f64),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateReference => write!(f, "reference equals blank"),
            Self::NonFinite => write!(f, "non-finite ratio"),
            Self::BelowLow(v) => write!(f, "ratio {v:.2} below low bound"),
            Self::AboveHigh(v) => write!(f, "ratio {v:.2} above high bound"),
        }
    }
}

/// Outcome of classifying one peak.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InfluxClass {
    /// Usable influx in `[0, 100]`.
    Kept(f64),
    Rejected(Rejection),
}

impl InfluxClass {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Kept(v) => Some(*v),
            Self::Rejected(_) => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Raw influx percentage `(sample - blank) / (ionomycin - blank) * 100`.
pub fn influx_ratio(ionomycin: u64, sample: u64, blank: u64) -> f64 {
    let numerator = sample as f64 - blank as f64;
    let denominator = ionomycin as f64 - blank as f64;
    numerator / denominator * FULL_INFLUX
}

/// Apply the saturation/rejection policy to a raw ratio.
pub fn classify_ratio(raw: f64, bounds: InfluxBounds) -> InfluxClass {
    let high = f64::from(bounds.high);
    let low = f64::from(bounds.low);

    if !raw.is_finite() {
        InfluxClass::Rejected(Rejection::NonFinite)
    } else if raw < low {
        InfluxClass::Rejected(Rejection::BelowLow(raw))
    } else if raw > high {
        InfluxClass::Rejected(Rejection::AboveHigh(raw))
    } else if raw >= FULL_INFLUX {
        InfluxClass::Kept(FULL_INFLUX)
    } else if raw <= 0.0 {
        InfluxClass::Kept(0.0)
    } else {
        InfluxClass::Kept(raw)
    }
}

/// Classify one peak from its integrated channel intensities.
pub fn classify(ionomycin: u64, sample: u64, blank: u64, bounds: InfluxBounds) -> InfluxClass {
    if ionomycin == blank {
        return InfluxClass::Rejected(Rejection::DegenerateReference);
    }
    classify_ratio(influx_ratio(ionomycin, sample, blank), bounds)
}

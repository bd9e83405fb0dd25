use tracing::debug;

use crate::detection::{locate_peaks, DetectionConfig};
use crate::frame::FieldOfView;
use crate::measure::{classify, integrate_peaks, InfluxBounds, InfluxClass};

use super::types::{FieldResult, InfluxRow, IntensityRow};

/// Detect peaks on the reference channel, integrate all three channels at
/// those peaks and classify each triplet.
pub(super) fn analyze_field(
    field: &FieldOfView,
    detection: &DetectionConfig,
    radius: u32,
    bounds: InfluxBounds,
) -> FieldResult {
    let peaks = locate_peaks(&field.reference, field.index, detection);

    let ionomycin = integrate_peaks(&field.reference, &peaks, radius);
    let sample = integrate_peaks(&field.sample, &peaks, radius);
    let blank = integrate_peaks(&field.blank, &peaks, radius);

    let mut rows = Vec::with_capacity(peaks.len());
    let mut rejected = Vec::new();

    for (i, peak) in peaks.iter().enumerate() {
        let intensities = IntensityRow {
            field: field.index,
            x: peak.x,
            y: peak.y,
            ionomycin: ionomycin[i],
            sample: sample[i],
            blank: blank[i],
        };
        match classify(intensities.ionomycin, intensities.sample, intensities.blank, bounds) {
            InfluxClass::Kept(influx) => rows.push(InfluxRow {
                intensities,
                influx,
            }),
            InfluxClass::Rejected(reason) => {
                debug!(field = field.index, x = peak.x, y = peak.y, %reason, "Peak rejected");
                rejected.push((intensities, reason));
            }
        }
    }

    FieldResult {
        field: field.index,
        rows,
        rejected,
    }
}

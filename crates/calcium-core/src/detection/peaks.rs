use tracing::debug;

use crate::frame::Frame;

use super::components::connected_components;
use super::config::DetectionConfig;
use super::filters::{maximum_filter_3x3, minimum_filter_3x3};

/// A located particle centre.
///
/// `x` is the column and `y` the row of the truncated centroid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Peak {
    /// Field of view the peak was found in.
    pub field: usize,
    pub x: usize,
    pub y: usize,
}

/// Locate bright, locally significant particles in a frame.
///
/// Pipeline: 3x3 max/min filters -> keep pixels equal to their local max
/// whose local contrast exceeds the threshold -> connected components ->
/// intensity-weighted centroid per component -> border exclusion.
///
/// Peaks are returned in component label order.
pub fn locate_peaks(frame: &Frame, field: usize, config: &DetectionConfig) -> Vec<Peak> {
    let (h, w) = frame.data.dim();
    let margin = config.border_margin;
    if h <= 2 * margin || w <= 2 * margin {
        return Vec::new();
    }

    let local_max = maximum_filter_3x3(&frame.data);
    let local_min = minimum_filter_3x3(&frame.data);
    let threshold = i64::from(config.threshold);

    let mut mask = ndarray::Array2::from_elem((h, w), false);
    ndarray::Zip::from(&mut mask)
        .and(&frame.data)
        .and(&local_max)
        .and(&local_min)
        .for_each(|m, &v, &max, &min| {
            *m = v == max && i64::from(max) - i64::from(min) > threshold;
        });

    let components = connected_components(&mask, &frame.data);
    let candidates = components.len();

    let peaks: Vec<Peak> = components
        .iter()
        .filter_map(|c| {
            let (row, col) = c.centroid();
            // Centroids are non-negative, so the cast truncates like floor.
            let (y, x) = (row as usize, col as usize);
            let inside = x > margin && x < w - margin && y > margin && y < h - margin;
            inside.then_some(Peak { field, x, y })
        })
        .collect();

    debug!(
        field,
        threshold = config.threshold,
        candidates,
        kept = peaks.len(),
        "Peaks located"
    );
    peaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn config(threshold: u32, border_margin: usize) -> DetectionConfig {
        DetectionConfig {
            threshold,
            border_margin,
        }
    }

    #[test]
    fn flat_plateau_merges_into_one_peak() {
        let mut data = Array2::<u16>::from_elem((20, 20), 10);
        data[[8, 8]] = 200;
        data[[8, 9]] = 200;
        let peaks = locate_peaks(&Frame::new(data), 0, &config(50, 2));
        assert_eq!(peaks.len(), 1);
        // Centroid column 8.5 truncates to 8.
        assert_eq!((peaks[0].x, peaks[0].y), (8, 8));
    }

    #[test]
    fn low_contrast_maximum_is_ignored() {
        let mut data = Array2::<u16>::from_elem((20, 20), 100);
        data[[10, 10]] = 150;
        assert!(locate_peaks(&Frame::new(data.clone()), 0, &config(50, 2)).is_empty());
        assert_eq!(locate_peaks(&Frame::new(data), 0, &config(49, 2)).len(), 1);
    }

    #[test]
    fn faintest_peak_on_zero_background_has_weight() {
        let mut data = Array2::<u16>::zeros((20, 20));
        data[[12, 7]] = 1;
        let peaks = locate_peaks(&Frame::new(data), 0, &config(0, 2));
        assert_eq!(peaks.len(), 1);
        assert_eq!((peaks[0].x, peaks[0].y), (7, 12));
    }

    #[test]
    fn tiny_frame_has_no_interior() {
        let data = Array2::<u16>::from_elem((10, 10), 0);
        assert!(locate_peaks(&Frame::new(data), 0, &config(1, 5)).is_empty());
    }
}

use rayon::prelude::*;

use crate::consts::PARALLEL_PEAK_THRESHOLD;
use crate::detection::Peak;
use crate::frame::Frame;

/// Sum every pixel whose centre lies within `radius` of `(x, y)`.
///
/// Membership test is `(px - x)^2 + (py - y)^2 <= radius^2`. Disk pixels
/// falling outside the frame contribute nothing.
pub fn integrate_disk(frame: &Frame, x: usize, y: usize, radius: u32) -> u64 {
    let (h, w) = frame.data.dim();
    if h == 0 || w == 0 {
        return 0;
    }

    let r = radius as usize;
    let r_sq = u64::from(radius) * u64::from(radius);
    let row_min = y.saturating_sub(r);
    let row_max = y.saturating_add(r).min(h - 1);
    let col_min = x.saturating_sub(r);
    let col_max = x.saturating_add(r).min(w - 1);

    let mut total = 0u64;
    for row in row_min..=row_max {
        let dy = row.abs_diff(y) as u64;
        for col in col_min..=col_max {
            let dx = col.abs_diff(x) as u64;
            if dx * dx + dy * dy <= r_sq {
                total += u64::from(frame.data[[row, col]]);
            }
        }
    }
    total
}

/// Integrate a disk around each peak. Output order matches `peaks`.
pub fn integrate_peaks(frame: &Frame, peaks: &[Peak], radius: u32) -> Vec<u64> {
    if peaks.len() >= PARALLEL_PEAK_THRESHOLD {
        peaks
            .par_iter()
            .map(|p| integrate_disk(frame, p.x, p.y, radius))
            .collect()
    } else {
        peaks
            .iter()
            .map(|p| integrate_disk(frame, p.x, p.y, radius))
            .collect()
    }
}

use std::sync::Arc;

use ndarray::Array2;
use num_complex::Complex;
use rayon::prelude::*;
use rustfft::{Fft, FftPlanner};
use tracing::debug;

use crate::consts::{CORRELATION_TIE_TOLERANCE, PARALLEL_PIXEL_THRESHOLD};
use crate::error::Result;
use crate::frame::{Frame, PixelShift};

/// Sample and blank channels aligned onto the reference grid.
#[derive(Clone, Debug)]
pub struct Registration {
    pub sample: Frame,
    pub blank: Frame,
    pub sample_shift: PixelShift,
    pub blank_shift: PixelShift,
}

/// Align `sample` and `blank` to `reference` by integer translation.
///
/// The translation for each channel is the lag of the global maximum of its
/// cross-correlation with the reference. Pixels shifted in from outside the
/// frame are zero. Both output frames have the reference's dimensions.
pub fn register(reference: &Frame, sample: &Frame, blank: &Frame) -> Result<Registration> {
    reference.ensure_same_size(sample)?;
    reference.ensure_same_size(blank)?;

    let correlator = CrossCorrelator::new(reference);
    let sample_shift = correlator.shift_of(sample);
    let blank_shift = correlator.shift_of(blank);
    debug!(
        sample_dx = sample_shift.dx,
        sample_dy = sample_shift.dy,
        blank_dx = blank_shift.dx,
        blank_dy = blank_shift.dy,
        "Registration offsets"
    );

    Ok(Registration {
        sample: shift_frame(sample, sample_shift),
        blank: shift_frame(blank, blank_shift),
        sample_shift,
        blank_shift,
    })
}

/// Compute the integer translation that aligns `target` onto `reference`.
pub fn compute_shift(reference: &Frame, target: &Frame) -> Result<PixelShift> {
    reference.ensure_same_size(target)?;
    Ok(CrossCorrelator::new(reference).shift_of(target))
}

/// Holds the reference spectrum so several channels can be correlated
/// against it without transforming the reference again.
struct CrossCorrelator {
    spectrum: Option<Array2<Complex<f64>>>,
    planner: FftPlans,
    dim: (usize, usize),
}

impl CrossCorrelator {
    fn new(reference: &Frame) -> Self {
        let dim = reference.data.dim();
        let planner = FftPlans::new(dim.0, dim.1);
        // A flat reference has no usable correlation structure.
        let spectrum = if reference.is_uniform() {
            debug!("Uniform reference frame, registration disabled");
            None
        } else {
            Some(fft2d(&reference.data, &planner))
        };
        Self {
            spectrum,
            planner,
            dim,
        }
    }

    fn shift_of(&self, target: &Frame) -> PixelShift {
        let Some(ref_fft) = &self.spectrum else {
            return PixelShift::default();
        };
        if target.is_uniform() {
            debug!("Uniform target frame, treating offset as zero");
            return PixelShift::default();
        }

        let tgt_fft = fft2d(&target.data, &self.planner);
        let cross = cross_power(ref_fft, &tgt_fft);
        let correlation = ifft2d(cross, &self.planner);
        let (peak_row, peak_col, _) = find_peak(&correlation);

        let (h, w) = self.dim;
        PixelShift {
            dx: signed_lag(peak_col, w),
            dy: signed_lag(peak_row, h),
        }
    }
}

/// Map a circular lag index to the signed range of a zero-centred surface.
fn signed_lag(index: usize, len: usize) -> i64 {
    if index >= len.div_ceil(2) {
        index as i64 - len as i64
    } else {
        index as i64
    }
}

/// Translate a frame by an integer shift, filling uncovered pixels with zero.
pub fn shift_frame(frame: &Frame, shift: PixelShift) -> Frame {
    if shift.is_zero() {
        return frame.clone();
    }

    let (h, w) = frame.data.dim();
    let mut result = Array2::<u16>::zeros((h, w));

    for row in 0..h {
        let src_row = row as i64 - shift.dy;
        if src_row < 0 || src_row >= h as i64 {
            continue;
        }
        for col in 0..w {
            let src_col = col as i64 - shift.dx;
            if src_col >= 0 && src_col < w as i64 {
                result[[row, col]] = frame.data[[src_row as usize, src_col as usize]];
            }
        }
    }

    Frame::new(result)
}

struct FftPlans {
    row_forward: Arc<dyn Fft<f64>>,
    col_forward: Arc<dyn Fft<f64>>,
    row_inverse: Arc<dyn Fft<f64>>,
    col_inverse: Arc<dyn Fft<f64>>,
}

impl FftPlans {
    fn new(h: usize, w: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            row_forward: planner.plan_fft_forward(w),
            col_forward: planner.plan_fft_forward(h),
            row_inverse: planner.plan_fft_inverse(w),
            col_inverse: planner.plan_fft_inverse(h),
        }
    }
}

/// 2D FFT: row-wise FFT, then column-wise FFT.
fn fft2d(data: &Array2<u16>, plans: &FftPlans) -> Array2<Complex<f64>> {
    let mut result = data.mapv(|v| Complex::new(f64::from(v), 0.0));
    transform_rows(&mut result, &plans.row_forward);
    transform_cols(&mut result, &plans.col_forward);
    result
}

/// Inverse 2D FFT, returning the normalized real part.
fn ifft2d(mut data: Array2<Complex<f64>>, plans: &FftPlans) -> Array2<f64> {
    transform_cols(&mut data, &plans.col_inverse);
    transform_rows(&mut data, &plans.row_inverse);

    let (h, w) = data.dim();
    let scale = 1.0 / (h * w) as f64;
    data.mapv(|c| c.re * scale)
}

fn transform_rows(data: &mut Array2<Complex<f64>>, fft: &Arc<dyn Fft<f64>>) {
    let (h, w) = data.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let processed: Vec<Vec<Complex<f64>>> = (0..h)
            .into_par_iter()
            .map(|row| {
                let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| data[[row, c]]).collect();
                fft.process(&mut row_data);
                row_data
            })
            .collect();
        for (row, row_data) in processed.into_iter().enumerate() {
            for (col, val) in row_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    } else {
        for row in 0..h {
            let mut row_data: Vec<Complex<f64>> = (0..w).map(|c| data[[row, c]]).collect();
            fft.process(&mut row_data);
            for (col, val) in row_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    }
}

fn transform_cols(data: &mut Array2<Complex<f64>>, fft: &Arc<dyn Fft<f64>>) {
    let (h, w) = data.dim();
    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        let processed: Vec<Vec<Complex<f64>>> = (0..w)
            .into_par_iter()
            .map(|col| {
                let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| data[[r, col]]).collect();
                fft.process(&mut col_data);
                col_data
            })
            .collect();
        for (col, col_data) in processed.into_iter().enumerate() {
            for (row, val) in col_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    } else {
        for col in 0..w {
            let mut col_data: Vec<Complex<f64>> = (0..h).map(|r| data[[r, col]]).collect();
            fft.process(&mut col_data);
            for (row, val) in col_data.into_iter().enumerate() {
                data[[row, col]] = val;
            }
        }
    }
}

/// Unnormalized cross-power spectrum `reference * conj(target)`.
fn cross_power(
    ref_fft: &Array2<Complex<f64>>,
    tgt_fft: &Array2<Complex<f64>>,
) -> Array2<Complex<f64>> {
    let mut result = ref_fft.clone();
    result.zip_mut_with(tgt_fft, |r, t| *r *= t.conj());
    result
}

/// Global maximum in raster order. Near-ties keep the earliest position, so
/// a periodic or flat surface resolves to zero lag.
fn find_peak(data: &Array2<f64>) -> (usize, usize, f64) {
    let mut best_row = 0;
    let mut best_col = 0;
    let mut best_val = f64::NEG_INFINITY;

    for ((row, col), &val) in data.indexed_iter() {
        if !val.is_finite() {
            continue;
        }
        let margin = if best_val.is_finite() {
            best_val.abs() * CORRELATION_TIE_TOLERANCE
        } else {
            0.0
        };
        if val > best_val + margin {
            best_val = val;
            best_row = row;
            best_col = col;
        }
    }

    (best_row, best_col, best_val)
}

use ndarray::Array2;

use crate::error::{CalciumError, Result};

/// A single averaged fluorescence frame.
/// Pixel values are raw 16-bit camera counts.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<u16>,
}

impl Frame {
    pub fn new(data: Array2<u16>) -> Self {
        Self { data }
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    /// Fail unless `other` has the same shape as `self`.
    pub fn ensure_same_size(&self, other: &Frame) -> Result<()> {
        if self.data.dim() != other.data.dim() {
            return Err(CalciumError::DimensionMismatch {
                expected_width: self.width(),
                expected_height: self.height(),
                width: other.width(),
                height: other.height(),
            });
        }
        Ok(())
    }

    /// True when every pixel has the same value (or the frame is empty).
    pub fn is_uniform(&self) -> bool {
        match self.data.iter().next() {
            Some(&first) => self.data.iter().all(|&v| v == first),
            None => true,
        }
    }
}

/// Integer translation applied to a channel to align it with the reference.
///
/// A pixel at `(row, col)` in the aligned frame is sourced from
/// `(row - dy, col - dx)` in the unaligned frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PixelShift {
    pub dx: i64,
    pub dy: i64,
}

impl PixelShift {
    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// One imaged region of a sample with its three registered channels.
#[derive(Clone, Debug)]
pub struct FieldOfView {
    /// Position in the sorted reference-channel file list.
    pub index: usize,
    /// Stack file name shared by the three channels, if loaded from disk.
    pub name: Option<String>,
    pub reference: Frame,
    /// Sample channel after alignment.
    pub sample: Frame,
    /// Blank channel after alignment.
    pub blank: Frame,
    pub sample_shift: PixelShift,
    pub blank_shift: PixelShift,
}

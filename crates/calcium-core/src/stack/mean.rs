use ndarray::Array2;

use crate::error::{CalciumError, Result};
use crate::frame::Frame;

/// Reduce a temporal stack to one frame by the pixel-wise mean.
///
/// The mean is truncated toward zero to `u16`.
pub fn mean_stack(planes: &[Array2<u16>]) -> Result<Frame> {
    let mut stacker = StreamingMeanStacker::new();
    for plane in planes {
        stacker.add(plane)?;
    }
    stacker.finish()
}

/// Accumulates planes one at a time so a decoder never has to hold the
/// whole stack in memory.
#[derive(Debug, Default)]
pub struct StreamingMeanStacker {
    sum: Option<Array2<u64>>,
    count: u64,
}

impl StreamingMeanStacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn add(&mut self, plane: &Array2<u16>) -> Result<()> {
        match self.sum {
            None => {
                let (h, w) = plane.dim();
                if h == 0 || w == 0 {
                    return Err(CalciumError::InvalidDimensions {
                        width: w,
                        height: h,
                    });
                }
                self.sum = Some(plane.mapv(u64::from));
            }
            Some(ref mut sum) => {
                if sum.dim() != plane.dim() {
                    let (eh, ew) = sum.dim();
                    let (h, w) = plane.dim();
                    return Err(CalciumError::DimensionMismatch {
                        expected_width: ew,
                        expected_height: eh,
                        width: w,
                        height: h,
                    });
                }
                sum.zip_mut_with(plane, |acc, &v| *acc += u64::from(v));
            }
        }
        self.count += 1;
        Ok(())
    }

    pub fn finish(self) -> Result<Frame> {
        let sum = self.sum.ok_or(CalciumError::EmptySequence)?;
        let n = self.count;
        // Integer division truncates exactly like casting the float mean.
        Ok(Frame::new(sum.mapv(|s| (s / n) as u16)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn mean_truncates_toward_zero() {
        let a = array![[1u16, 10], [100, 65535]];
        let b = array![[2u16, 11], [101, 65535]];
        let frame = mean_stack(&[a, b]).unwrap();
        assert_eq!(frame.data, array![[1u16, 10], [100, 65535]]);
    }

    #[test]
    fn empty_stack_is_an_error() {
        assert!(matches!(mean_stack(&[]), Err(CalciumError::EmptySequence)));
    }

    #[test]
    fn mismatched_planes_are_rejected() {
        let mut stacker = StreamingMeanStacker::new();
        stacker.add(&Array2::zeros((4, 4))).unwrap();
        assert!(stacker.add(&Array2::zeros((4, 5))).is_err());
        assert_eq!(stacker.count(), 1);
    }
}

use std::path::Path;

use image::DynamicImage;
use ndarray::Array2;

use crate::error::Result;
use crate::frame::Frame;

/// Load a single-frame grayscale image into a Frame.
///
/// 8-bit images keep their raw counts; anything else goes through 16-bit luma.
pub fn load_image(path: &Path) -> Result<Frame> {
    let img = image::open(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut data = Array2::<u16>::zeros((h, w));

    match img {
        DynamicImage::ImageLuma8(gray) => {
            for (col, row, pixel) in gray.enumerate_pixels() {
                data[[row as usize, col as usize]] = u16::from(pixel.0[0]);
            }
        }
        other => {
            let gray = other.to_luma16();
            for (col, row, pixel) in gray.enumerate_pixels() {
                data[[row as usize, col as usize]] = pixel.0[0];
            }
        }
    }

    Ok(Frame::new(data))
}

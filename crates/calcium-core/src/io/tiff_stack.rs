use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array2;
use num_traits::ToPrimitive;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::ColorType;
use tracing::debug;

use crate::consts::TIFF_EXTENSIONS;
use crate::error::{CalciumError, Result};
use crate::frame::Frame;
use crate::stack::StreamingMeanStacker;

use super::image_io::load_image;

/// Source of averaged frames for one stack file.
///
/// The pipeline only needs one representative frame per stack; how the
/// stack is stored and reduced is up to the implementor.
pub trait StackReader: Send + Sync {
    fn read_frame(&self, path: &Path) -> Result<Frame>;
}

/// Reads multi-page grayscale TIFF stacks and averages all pages.
///
/// Other listed formats (PNG) are loaded as a single-frame image.
#[derive(Clone, Copy, Debug, Default)]
pub struct TiffStackReader;

impl StackReader for TiffStackReader {
    fn read_frame(&self, path: &Path) -> Result<Frame> {
        if is_tiff(path) {
            read_tiff_mean(path)
        } else {
            load_image(path)
        }
    }
}

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| TIFF_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Decode every page of a TIFF stack and return the pixel-wise mean.
pub fn read_tiff_mean(path: &Path) -> Result<Frame> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?;
    let mut stacker = StreamingMeanStacker::new();

    loop {
        let plane = read_page(&mut decoder, path)?;
        stacker.add(&plane)?;
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    debug!(path = %path.display(), pages = stacker.count(), "Averaged TIFF stack");
    stacker.finish()
}

fn read_page(decoder: &mut Decoder<BufReader<File>>, path: &Path) -> Result<Array2<u16>> {
    let (width, height) = decoder.dimensions()?;
    let color_type = decoder.colortype()?;
    if !matches!(color_type, ColorType::Gray(_)) {
        return Err(CalciumError::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            detail: format!("{color_type:?}"),
        });
    }

    let (w, h) = (width as usize, height as usize);
    match decoder.read_image()? {
        DecodingResult::U8(buf) => to_plane(&buf, w, h, path),
        DecodingResult::U16(buf) => to_plane(&buf, w, h, path),
        DecodingResult::U32(buf) => to_plane(&buf, w, h, path),
        DecodingResult::U64(buf) => to_plane(&buf, w, h, path),
        _ => Err(CalciumError::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            detail: "non-integer or signed samples".to_string(),
        }),
    }
}

fn to_plane<T: ToPrimitive + Copy>(
    buf: &[T],
    width: usize,
    height: usize,
    path: &Path,
) -> Result<Array2<u16>> {
    if buf.len() != width * height {
        return Err(CalciumError::UnsupportedPixelFormat {
            path: path.to_path_buf(),
            detail: format!(
                "expected {} samples for {}x{}, found {}",
                width * height,
                width,
                height,
                buf.len()
            ),
        });
    }

    let pixels = buf
        .iter()
        .map(|v| {
            v.to_u16().ok_or_else(|| CalciumError::UnsupportedPixelFormat {
                path: path.to_path_buf(),
                detail: "sample exceeds 16-bit range".to_string(),
            })
        })
        .collect::<Result<Vec<u16>>>()?;

    Array2::from_shape_vec((height, width), pixels).map_err(|_| CalciumError::InvalidDimensions {
        width,
        height,
    })
}

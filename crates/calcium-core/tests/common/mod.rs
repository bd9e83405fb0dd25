use std::fs::{self, File};
use std::path::Path;

use ndarray::Array2;
use tiff::encoder::{colortype, TiffEncoder};

use calcium_core::frame::Frame;

/// Frame with a constant background and single-pixel spots added on top.
///
/// Spots are `(row, col, amplitude)`.
pub fn spot_frame(height: usize, width: usize, background: u16, spots: &[(usize, usize, u16)]) -> Frame {
    let mut data = Array2::<u16>::from_elem((height, width), background);
    for &(row, col, amplitude) in spots {
        data[[row, col]] += amplitude;
    }
    Frame::new(data)
}

/// Deterministic pseudo-random texture (LCG), useful as a non-periodic frame.
pub fn textured_frame(height: usize, width: usize, seed: u64) -> Frame {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    let data = Array2::from_shape_fn((height, width), |_| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) % 4096) as u16
    });
    Frame::new(data)
}

/// Write planes as a multi-page 16-bit grayscale TIFF.
pub fn write_stack(path: &Path, planes: &[Array2<u16>]) {
    let mut file = File::create(path).expect("create stack file");
    let mut encoder = TiffEncoder::new(&mut file).expect("create encoder");
    for plane in planes {
        let (h, w) = plane.dim();
        let pixels: Vec<u16> = plane.iter().copied().collect();
        encoder
            .write_image::<colortype::Gray16>(w as u32, h as u32, &pixels)
            .expect("write page");
    }
}

/// Write a two-page stack whose pixel mean is exactly `frame`.
///
/// Pages differ by one count around the frame so the mean has to be taken.
pub fn write_frame_as_stack(path: &Path, frame: &Frame) {
    let low = frame.data.mapv(|v| v.saturating_sub(1));
    let high = frame.data.mapv(|v| if v == 0 { 0 } else { v + 1 });
    write_stack(path, &[low, high]);
}

/// Create `root/name/{Ionomycin,Sample,Blank}` holding one stack per field.
///
/// Channels listed in `omit` are not created.
pub fn write_sample_dir(
    root: &Path,
    name: &str,
    fields: &[(Frame, Frame, Frame)],
    omit: &[&str],
) {
    let main = root.join(name);
    fs::create_dir_all(&main).expect("create sample dir");
    for channel in ["Ionomycin", "Sample", "Blank"] {
        if omit.contains(&channel) {
            continue;
        }
        let dir = main.join(channel);
        fs::create_dir_all(&dir).expect("create channel dir");
        for (i, (reference, sample, blank)) in fields.iter().enumerate() {
            let frame = match channel {
                "Ionomycin" => reference,
                "Sample" => sample,
                _ => blank,
            };
            write_frame_as_stack(&dir.join(format!("field_{i:02}.tif")), frame);
        }
    }
}

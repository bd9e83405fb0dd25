#[allow(dead_code)]
mod common;

use ndarray::Array2;

use calcium_core::align::{compute_shift, register, shift_frame};
use calcium_core::error::CalciumError;
use calcium_core::frame::{Frame, PixelShift};

use common::{spot_frame, textured_frame};

#[test]
fn test_identical_frames_register_to_themselves() {
    for seed in [1, 7, 42] {
        let frame = textured_frame(48, 64, seed);
        let reg = register(&frame, &frame, &frame).unwrap();
        assert_eq!(reg.sample_shift, PixelShift::default());
        assert_eq!(reg.blank_shift, PixelShift::default());
        assert_eq!(reg.sample, frame);
        assert_eq!(reg.blank, frame);
    }
}

#[test]
fn test_periodic_frame_resolves_to_zero_shift() {
    // A checkerboard correlates equally well at several lags.
    let data = Array2::from_shape_fn((32, 32), |(r, c)| if (r + c) % 2 == 0 { 500 } else { 0 });
    let frame = Frame::new(data);
    let reg = register(&frame, &frame, &frame).unwrap();
    assert_eq!(reg.sample_shift, PixelShift::default());
    assert_eq!(reg.sample, frame);
}

#[test]
fn test_uniform_frames_do_not_shift() {
    let flat = Frame::new(Array2::from_elem((32, 32), 123));
    let textured = textured_frame(32, 32, 3);

    let reg = register(&flat, &textured, &flat).unwrap();
    assert!(reg.sample_shift.is_zero());
    assert!(reg.blank_shift.is_zero());
    assert_eq!(reg.sample, textured);

    let reg = register(&textured, &flat, &flat).unwrap();
    assert!(reg.sample_shift.is_zero());
    assert_eq!(reg.sample, flat);
}

#[test]
fn test_known_integer_shift_is_recovered() {
    let reference = spot_frame(
        64,
        64,
        0,
        &[(20, 22, 900), (30, 40, 700), (45, 18, 500), (50, 50, 300)],
    );
    // Content moved down 3 rows and left 5 columns.
    let moved = shift_frame(&reference, PixelShift { dx: -5, dy: 3 });

    let shift = compute_shift(&reference, &moved).unwrap();
    assert_eq!(shift, PixelShift { dx: 5, dy: -3 });

    let reg = register(&reference, &moved, &reference).unwrap();
    assert_eq!(reg.sample_shift, PixelShift { dx: 5, dy: -3 });
    assert!(reg.blank_shift.is_zero());
    for &(row, col) in &[(20, 22), (30, 40), (45, 18), (50, 50)] {
        assert_eq!(reg.sample.data[[row, col]], reference.data[[row, col]]);
    }
}

#[test]
fn test_shift_on_textured_frame() {
    let reference = textured_frame(64, 48, 11);
    let moved = shift_frame(&reference, PixelShift { dx: 4, dy: -6 });
    let reg = register(&reference, &moved, &moved).unwrap();
    assert_eq!(reg.sample_shift, PixelShift { dx: -4, dy: 6 });
    assert_eq!(reg.blank_shift, PixelShift { dx: -4, dy: 6 });

    // Away from the zero-filled border the aligned frame matches exactly.
    for row in 6..58 {
        for col in 4..44 {
            assert_eq!(reg.sample.data[[row, col]], reference.data[[row, col]]);
        }
    }
}

#[test]
fn test_registered_frames_keep_reference_size() {
    let reference = textured_frame(40, 56, 5);
    let moved = shift_frame(&reference, PixelShift { dx: 2, dy: 1 });
    let reg = register(&reference, &moved, &moved).unwrap();
    assert_eq!(reg.sample.data.dim(), (40, 56));
    assert_eq!(reg.blank.data.dim(), (40, 56));
}

#[test]
fn test_size_mismatch_is_an_error() {
    let a = textured_frame(32, 32, 1);
    let b = textured_frame(32, 31, 1);
    assert!(matches!(
        register(&a, &b, &a),
        Err(CalciumError::DimensionMismatch { .. })
    ));
}

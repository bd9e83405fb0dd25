pub mod cross_correlation;

pub use cross_correlation::{compute_shift, register, shift_frame, Registration};

pub mod image_io;
pub mod layout;
pub mod tiff_stack;

pub use layout::{list_sample_dirs, list_stack_files, PathReport, SamplePaths};
pub use tiff_stack::{read_tiff_mean, StackReader, TiffStackReader};

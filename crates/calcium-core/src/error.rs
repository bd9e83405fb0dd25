use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalciumError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read input root {path}: {source}")]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("TIFF decode error: {0}")]
    Tiff(#[from] tiff::TiffError),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Unsupported pixel format in {path}: {detail}")]
    UnsupportedPixelFormat { path: PathBuf, detail: String },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Frame size mismatch: {expected_width}x{expected_height} vs {width}x{height}")]
    DimensionMismatch {
        expected_width: usize,
        expected_height: usize,
        width: usize,
        height: usize,
    },

    #[error("Empty frame stack")]
    EmptySequence,

    #[error("Path error with {missing} folder(s) in {sample}")]
    InvalidSamplePath { sample: String, missing: String },

    #[error("Sample {0} has not been registered")]
    NotRegistered(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CalciumError>;

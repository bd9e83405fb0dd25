/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum peak count to integrate peaks in parallel.
pub const PARALLEL_PEAK_THRESHOLD: usize = 256;

/// Default local-contrast threshold for peak detection.
pub const DEFAULT_THRESHOLD: u32 = 80;

/// Default integration disk radius in pixels.
pub const DEFAULT_RADIUS: u32 = 3;

/// Default upper influx bound (percent). Ratios above it are rejected.
pub const DEFAULT_HIGH_BOUND: i32 = 200;

/// Default lower influx bound (percent). Ratios below it are rejected.
pub const DEFAULT_LOW_BOUND: i32 = -100;

/// Peaks closer than this to any frame edge are discarded.
pub const DEFAULT_BORDER_MARGIN: usize = 30;

/// Maximum number of thresholds analysed in one run.
pub const MAX_THRESHOLDS: usize = 5;

/// Thresholds outside this range are flagged as likely misconfigured.
pub const SANE_THRESHOLD_RANGE: (u32, u32) = (20, 200);

/// Radii at or above this are flagged as likely too large.
pub const LARGE_RADIUS_WARNING: u32 = 10;

/// Full influx, reached when the sample matches the ionomycin response.
pub const FULL_INFLUX: f64 = 100.0;

/// Relative tolerance when comparing correlation maxima. A later maximum
/// must exceed the current best by this fraction to replace it.
pub const CORRELATION_TIE_TOLERANCE: f64 = 1e-9;

/// Channel subdirectory names inside a sample directory.
pub const IONOMYCIN_DIR: &str = "Ionomycin";
pub const SAMPLE_DIR: &str = "Sample";
pub const BLANK_DIR: &str = "Blank";

/// Output directory created under the input root; never treated as a sample.
pub const RESULTS_DIR: &str = "Results";

/// Multi-page TIFF extensions, averaged page by page.
pub const TIFF_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// File extensions listed as fields of view. Non-TIFF files are read as a
/// stack of one frame.
pub const STACK_EXTENSIONS: [&str; 3] = ["tif", "tiff", "png"];

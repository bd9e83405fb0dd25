use crate::io::PathReport;
use crate::measure::Rejection;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Registration,
    Analysis { threshold: u32 },
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Registration => write!(f, "Registering fields"),
            Self::Analysis { threshold } => write!(f, "Analysing at threshold {threshold}"),
        }
    }
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A sample is about to be processed. `index` counts from zero.
    fn begin_sample(&self, _name: &str, _index: usize, _total: usize) {}

    /// A new stage has started. `total_items` is the number of fields of
    /// view in this stage, if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}

    /// Polled between samples and between threshold passes. Returning
    /// false stops the batch at that checkpoint.
    fn should_continue(&self) -> bool {
        true
    }
}

/// No-op progress reporter, used when the caller does not need progress.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// Integrated channel intensities for one peak.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntensityRow {
    pub field: usize,
    pub x: usize,
    pub y: usize,
    pub ionomycin: u64,
    pub sample: u64,
    pub blank: u64,
}

/// A peak whose influx passed classification.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfluxRow {
    pub intensities: IntensityRow,
    /// Influx in percent, within `[0, 100]`.
    pub influx: f64,
}

/// Rows kept for one field of view at one threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldResult {
    pub field: usize,
    pub rows: Vec<InfluxRow>,
    /// Peaks dropped by classification, with the reason.
    pub rejected: Vec<(IntensityRow, Rejection)>,
}

impl FieldResult {
    pub fn peak_count(&self) -> usize {
        self.rows.len() + self.rejected.len()
    }

    pub fn error_count(&self) -> usize {
        self.rejected.len()
    }
}

/// All fields of one sample analysed at one threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleResult {
    pub threshold: u32,
    /// Indexed by field of view.
    pub fields: Vec<FieldResult>,
}

impl SampleResult {
    /// Kept rows across all fields, in field order.
    pub fn rows(&self) -> impl Iterator<Item = &InfluxRow> {
        self.fields.iter().flat_map(|f| f.rows.iter())
    }

    pub fn kept_count(&self) -> usize {
        self.fields.iter().map(|f| f.rows.len()).sum()
    }

    pub fn error_count(&self) -> usize {
        self.fields.iter().map(FieldResult::error_count).sum()
    }

    pub fn total_peaks(&self) -> usize {
        self.fields.iter().map(FieldResult::peak_count).sum()
    }

    /// Error count per field, indexed by field of view.
    pub fn field_errors(&self) -> Vec<usize> {
        self.fields.iter().map(FieldResult::error_count).collect()
    }

    /// Mean influx over kept rows; `None` when nothing was kept.
    pub fn mean_influx(&self) -> Option<f64> {
        let n = self.kept_count();
        if n == 0 {
            return None;
        }
        Some(self.rows().map(|r| r.influx).sum::<f64>() / n as f64)
    }

    /// Fraction of peaks dropped; `None` when no peaks were found.
    pub fn error_rate(&self) -> Option<f64> {
        let total = self.total_peaks();
        if total == 0 {
            return None;
        }
        Some(self.error_count() as f64 / total as f64)
    }

    pub fn summary(&self, file: &str) -> SummaryRow {
        SummaryRow {
            file: file.to_string(),
            threshold: self.threshold,
            mean_influx: self.mean_influx(),
            kept_count: self.kept_count(),
            error_count: self.error_count(),
        }
    }
}

/// One line of the run summary: a sample at a threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub file: String,
    pub threshold: u32,
    pub mean_influx: Option<f64>,
    pub kept_count: usize,
    pub error_count: usize,
}

/// Structured error information for one sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorReport {
    pub path: PathReport,
    /// Rows classified as errors per field, for the latest threshold.
    pub field_errors: Vec<usize>,
}

use std::path::Path;

use tracing::{info, warn};

use crate::error::Result;
use crate::io::{list_sample_dirs, PathReport, StackReader};

use super::config::AnalysisConfig;
use super::sample::CalciumSample;
use super::types::{ProgressReporter, SampleResult, SummaryRow};

/// What happened to one sample in a batch.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleOutcome {
    /// Every requested threshold was analysed.
    Analyzed,
    /// A channel directory was missing; nothing was loaded.
    Skipped { missing: String },
    /// Loading or registration failed part way.
    Failed { reason: String },
    /// The reporter stopped the run before every threshold was analysed.
    /// `results` holds the thresholds that did complete.
    Cancelled,
}

/// Per-sample entry of a batch report.
#[derive(Clone, Debug)]
pub struct SampleReport {
    pub name: String,
    pub path: PathReport,
    pub outcome: SampleOutcome,
    /// One result per analysed threshold, in threshold order.
    pub results: Vec<SampleResult>,
}

/// Everything a batch run produced.
#[derive(Clone, Debug, Default)]
pub struct BatchReport {
    pub samples: Vec<SampleReport>,
    /// Set when the reporter asked to stop before all samples were done.
    pub cancelled: bool,
}

impl BatchReport {
    /// Combined summary over all samples and thresholds.
    pub fn summary(&self) -> Vec<SummaryRow> {
        self.samples
            .iter()
            .flat_map(|s| s.results.iter().map(|r| r.summary(&s.name)))
            .collect()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &SampleReport> {
        self.samples
            .iter()
            .filter(|s| matches!(s.outcome, SampleOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> impl Iterator<Item = &SampleReport> {
        self.samples
            .iter()
            .filter(|s| matches!(s.outcome, SampleOutcome::Failed { .. }))
    }
}

/// Analyse every sample directory under `root`.
///
/// Samples are processed one after another. A missing channel directory or
/// an unreadable stack only affects its own sample; the run fails outright
/// only when `root` itself cannot be listed or the config is unusable.
pub fn run_batch(
    root: &Path,
    config: &AnalysisConfig,
    reader: &dyn StackReader,
    reporter: &dyn ProgressReporter,
) -> Result<BatchReport> {
    for warning in config.validate()? {
        warn!(%warning, "Questionable configuration");
    }
    let thresholds = config.active_thresholds();
    let sample_dirs = list_sample_dirs(root)?;
    let total = sample_dirs.len();
    info!(root = %root.display(), samples = total, ?thresholds, "Starting batch");

    let mut report = BatchReport::default();
    for (index, dir) in sample_dirs.iter().enumerate() {
        if !reporter.should_continue() {
            report.cancelled = true;
            break;
        }

        let mut sample = CalciumSample::open(dir);
        reporter.begin_sample(sample.name(), index, total);
        let (sample_report, stopped) =
            process_sample(&mut sample, &thresholds, config, reader, reporter);
        report.samples.push(sample_report);
        if stopped {
            report.cancelled = true;
            break;
        }
    }

    info!(
        analysed = report
            .samples
            .iter()
            .filter(|s| s.outcome == SampleOutcome::Analyzed)
            .count(),
        skipped = report.skipped().count(),
        failed = report.failed().count(),
        cancelled = report.cancelled,
        "Batch complete"
    );
    Ok(report)
}

/// Register one sample and analyse it at each threshold. Returns the report
/// and whether the reporter asked to stop between thresholds.
fn process_sample(
    sample: &mut CalciumSample,
    thresholds: &[u32],
    config: &AnalysisConfig,
    reader: &dyn StackReader,
    reporter: &dyn ProgressReporter,
) -> (SampleReport, bool) {
    let mut sample_report = SampleReport {
        name: sample.name().to_string(),
        path: sample.error_report().path,
        outcome: SampleOutcome::Analyzed,
        results: Vec::new(),
    };

    if !sample.is_valid() {
        let missing = sample.error_report().path.missing_label();
        warn!(sample = %sample.name(), %missing, "Path error, sample skipped");
        sample_report.outcome = SampleOutcome::Skipped { missing };
        return (sample_report, false);
    }

    if let Err(e) = sample.register_reported(reader, reporter) {
        warn!(sample = %sample.name(), error = %e, "Registration failed, sample skipped");
        sample_report.outcome = SampleOutcome::Failed {
            reason: e.to_string(),
        };
        return (sample_report, false);
    }

    for &threshold in thresholds {
        if !reporter.should_continue() {
            info!(sample = %sample_report.name, threshold, "Stopped before threshold pass");
            sample_report.outcome = SampleOutcome::Cancelled;
            return (sample_report, true);
        }
        match sample.analyze_reported(threshold, config, reporter) {
            Ok(result) => sample_report.results.push(result.clone()),
            Err(e) => {
                sample_report.outcome = SampleOutcome::Failed {
                    reason: e.to_string(),
                };
                break;
            }
        }
    }

    (sample_report, false)
}

use std::path::PathBuf;

use tracing::{debug, info};

use crate::align::register;
use crate::error::{CalciumError, Result};
use crate::frame::{FieldOfView, Frame};
use crate::io::{list_stack_files, PathReport, SamplePaths, StackReader};

use super::config::AnalysisConfig;
use super::helpers::analyze_field;
use super::types::{ErrorReport, NoOpReporter, PipelineStage, ProgressReporter, SampleResult};

/// Lifecycle of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleState {
    /// Paths checked and valid, nothing loaded yet.
    Uninitialized,
    /// A channel directory is missing; the sample cannot be processed.
    Invalid,
    /// Fields of view loaded and aligned.
    Registered,
    /// Results available for the given threshold.
    Analyzed(u32),
}

/// One sample: three channel directories, their registered fields of view
/// and the result of the latest threshold pass.
#[derive(Clone, Debug)]
pub struct CalciumSample {
    name: String,
    paths: SamplePaths,
    error_report: ErrorReport,
    fields: Vec<FieldOfView>,
    result: Option<SampleResult>,
    state: SampleState,
}

impl CalciumSample {
    /// Check the sample directory layout. A sample with a missing directory
    /// starts out `Invalid`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let paths = SamplePaths::new(path);
        let name = paths
            .main
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| paths.main.display().to_string());
        let report = paths.check();
        let state = if report.is_valid() {
            SampleState::Uninitialized
        } else {
            SampleState::Invalid
        };

        Self {
            name,
            paths,
            error_report: ErrorReport {
                path: report,
                field_errors: Vec::new(),
            },
            fields: Vec::new(),
            result: None,
            state,
        }
    }

    /// Build an already-registered sample from in-memory channel frames,
    /// one `(reference, sample, blank)` triplet per field of view.
    pub fn from_frames<I>(name: &str, triplets: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Frame, Frame, Frame)>,
    {
        let mut sample = Self {
            name: name.to_string(),
            paths: SamplePaths::new(name),
            error_report: ErrorReport {
                path: PathReport {
                    main: true,
                    ionomycin: true,
                    sample: true,
                    blank: true,
                },
                field_errors: Vec::new(),
            },
            fields: Vec::new(),
            result: None,
            state: SampleState::Uninitialized,
        };
        sample.register_frames(triplets)?;
        Ok(sample)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn paths(&self) -> &SamplePaths {
        &self.paths
    }

    pub fn state(&self) -> SampleState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state != SampleState::Invalid
    }

    pub fn error_report(&self) -> &ErrorReport {
        &self.error_report
    }

    pub fn fields(&self) -> &[FieldOfView] {
        &self.fields
    }

    /// Result of the latest threshold pass, if any.
    pub fn result(&self) -> Option<&SampleResult> {
        self.result.as_ref()
    }

    /// Load, reduce and register every field of view from disk.
    pub fn register(&mut self, reader: &dyn StackReader) -> Result<usize> {
        self.register_reported(reader, &NoOpReporter)
    }

    /// Like [`register`](Self::register), reporting one item per field.
    ///
    /// Stacks are listed from the Ionomycin directory in sorted order; the
    /// Sample and Blank stacks with the same file name form the other two
    /// channels of that field.
    pub fn register_reported(
        &mut self,
        reader: &dyn StackReader,
        reporter: &dyn ProgressReporter,
    ) -> Result<usize> {
        self.ensure_valid()?;

        let names = list_stack_files(&self.paths.ionomycin)?;
        info!(sample = %self.name, fields = names.len(), "Registering sample");
        reporter.begin_stage(PipelineStage::Registration, Some(names.len()));

        let mut fields = Vec::with_capacity(names.len());
        for (index, name) in names.into_iter().enumerate() {
            let reference = reader.read_frame(&self.paths.ionomycin.join(&name))?;
            let sample = reader.read_frame(&self.paths.sample.join(&name))?;
            let blank = reader.read_frame(&self.paths.blank.join(&name))?;
            let mut field = build_field(index, reference, sample, blank)?;
            field.name = Some(name);
            fields.push(field);
            reporter.advance(index + 1);
        }
        reporter.finish_stage();

        Ok(self.install_fields(fields))
    }

    /// Register in-memory frame triplets, replacing any earlier fields.
    pub fn register_frames<I>(&mut self, triplets: I) -> Result<usize>
    where
        I: IntoIterator<Item = (Frame, Frame, Frame)>,
    {
        self.ensure_valid()?;
        let fields = triplets
            .into_iter()
            .enumerate()
            .map(|(index, (reference, sample, blank))| build_field(index, reference, sample, blank))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.install_fields(fields))
    }

    /// Run peak detection, integration and classification at one threshold.
    ///
    /// The previous result, if any, is replaced. Registered frames are
    /// reused as they are.
    pub fn analyze(&mut self, threshold: u32, config: &AnalysisConfig) -> Result<&SampleResult> {
        self.analyze_reported(threshold, config, &NoOpReporter)
    }

    pub fn analyze_reported(
        &mut self,
        threshold: u32,
        config: &AnalysisConfig,
        reporter: &dyn ProgressReporter,
    ) -> Result<&SampleResult> {
        self.ensure_valid()?;
        if self.state == SampleState::Uninitialized {
            return Err(CalciumError::NotRegistered(self.name.clone()));
        }

        let detection = config.detection(threshold);
        let bounds = config.bounds();
        reporter.begin_stage(PipelineStage::Analysis { threshold }, Some(self.fields.len()));

        let mut fields = Vec::with_capacity(self.fields.len());
        for (i, field) in self.fields.iter().enumerate() {
            let result = analyze_field(field, &detection, config.radius, bounds);
            debug!(
                sample = %self.name,
                field = field.index,
                kept = result.rows.len(),
                errors = result.error_count(),
                "Field analysed"
            );
            fields.push(result);
            reporter.advance(i + 1);
        }
        reporter.finish_stage();

        let result = SampleResult { threshold, fields };
        info!(
            sample = %self.name,
            threshold,
            kept = result.kept_count(),
            errors = result.error_count(),
            mean_influx = ?result.mean_influx(),
            "Sample analysed"
        );

        self.error_report.field_errors = result.field_errors();
        self.state = SampleState::Analyzed(threshold);
        Ok(self.result.insert(result))
    }

    fn ensure_valid(&self) -> Result<()> {
        if self.state == SampleState::Invalid {
            return Err(CalciumError::InvalidSamplePath {
                sample: self.name.clone(),
                missing: self.error_report.path.missing_label(),
            });
        }
        Ok(())
    }

    fn install_fields(&mut self, fields: Vec<FieldOfView>) -> usize {
        let count = fields.len();
        self.fields = fields;
        self.result = None;
        self.error_report.field_errors.clear();
        self.state = SampleState::Registered;
        count
    }
}

fn build_field(index: usize, reference: Frame, sample: Frame, blank: Frame) -> Result<FieldOfView> {
    let registration = register(&reference, &sample, &blank)?;
    Ok(FieldOfView {
        index,
        name: None,
        reference,
        sample: registration.sample,
        blank: registration.blank,
        sample_shift: registration.sample_shift,
        blank_shift: registration.blank_shift,
    })
}

mod batch;
pub mod config;
mod helpers;
mod sample;
mod types;

pub use batch::{run_batch, BatchReport, SampleOutcome, SampleReport};
pub use config::{parse_threshold_list, AnalysisConfig, ConfigWarning};
pub use sample::{CalciumSample, SampleState};
pub use types::{
    ErrorReport, FieldResult, InfluxRow, IntensityRow, NoOpReporter, PipelineStage,
    ProgressReporter, SampleResult, SummaryRow,
};

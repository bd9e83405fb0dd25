use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use calcium_core::io::TiffStackReader;
use calcium_core::pipeline::{CalciumSample, ProgressReporter};
use clap::Args;
use tracing::warn;

use super::AnalysisArgs;
use crate::progress::BarReporter;
use crate::report::write_influx_csv;
use crate::summary::print_sample_results;

#[derive(Args)]
pub struct SampleArgs {
    /// Sample directory holding Ionomycin, Sample and Blank
    pub dir: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Directory to write one CSV table per threshold
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: &SampleArgs) -> Result<()> {
    let config = args.analysis.resolve()?;
    for warning in config.validate()? {
        warn!(%warning, "Questionable configuration");
    }
    let thresholds = config.active_thresholds();

    let mut sample = CalciumSample::open(&args.dir);
    if !sample.is_valid() {
        bail!(
            "Path error with {} in {}",
            sample.error_report().path.missing_label(),
            args.dir.display()
        );
    }

    let reporter = BarReporter::new(thresholds.len())?;
    reporter.begin_sample(sample.name(), 0, 1);
    let fields = sample
        .register_reported(&TiffStackReader, &reporter)
        .with_context(|| format!("Failed to register {}", args.dir.display()))?;

    let mut results = Vec::with_capacity(thresholds.len());
    for &threshold in &thresholds {
        results.push(
            sample
                .analyze_reported(threshold, &config, &reporter)?
                .clone(),
        );
    }
    reporter.finish();

    if let Some(ref dir) = args.output {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for result in &results {
            let path = dir.join(format!("{}_at_{}.csv", sample.name(), result.threshold));
            write_influx_csv(&path, result)?;
        }
    }

    print_sample_results(sample.name(), fields, &results);
    Ok(())
}

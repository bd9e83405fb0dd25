use std::path::PathBuf;

use anyhow::Result;
use calcium_core::io::{list_sample_dirs, TiffStackReader};
use calcium_core::pipeline::run_batch;
use clap::Args;
use tracing::debug;

use super::AnalysisArgs;
use crate::progress::BarReporter;
use crate::report::{prepare_results_dir, write_batch_results};
use crate::summary::{print_batch_report, print_run_summary};

#[derive(Args)]
pub struct RunArgs {
    /// Root directory holding one subdirectory per sample
    pub root: PathBuf,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    /// Replace an existing Results directory
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = args.analysis.resolve()?;
    // Reject a bad config before touching the Results directory.
    config.validate()?;

    // An unreadable root stops the run before Results is touched.
    let samples = list_sample_dirs(&args.root)?;
    debug!(samples = samples.len(), root = %args.root.display(), "Input root listed");

    print_run_summary(&args.root, &config);
    let results_dir = prepare_results_dir(&args.root, args.force)?;

    let reporter = BarReporter::new(config.active_thresholds().len())?;
    let report = run_batch(&args.root, &config, &TiffStackReader, &reporter)?;
    reporter.finish();

    let written = write_batch_results(&results_dir, &report)?;
    print_batch_report(&report);
    println!("{} file(s) written to {}", written.len(), results_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(root: PathBuf) -> RunArgs {
        RunArgs {
            root,
            analysis: AnalysisArgs {
                config: None,
                thresholds: None,
                radius: None,
                high: None,
                low: None,
                margin: None,
            },
            force: false,
        }
    }

    #[test]
    fn test_missing_root_fails_without_creating_it() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("typo_root");

        let err = run(&args(root.clone())).unwrap_err();
        assert!(err.to_string().contains("typo_root"));
        assert!(!root.exists());
    }

    #[test]
    fn test_empty_root_writes_header_only_summary() {
        let root = tempfile::tempdir().unwrap();
        run(&args(root.path().to_path_buf())).unwrap();

        let summary = std::fs::read_to_string(root.path().join("Results/summary.csv")).unwrap();
        assert_eq!(summary, "file,threshold,influx,n,errors\n");
    }
}

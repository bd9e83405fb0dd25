use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use calcium_core::consts::RESULTS_DIR;
use calcium_core::pipeline::{BatchReport, InfluxRow, SampleResult, SummaryRow};

pub fn influx_csv_header() -> &'static str {
    "field,x,y,ionomycin,sample,blank,influx"
}

pub fn influx_csv_row(row: &InfluxRow) -> String {
    let i = &row.intensities;
    format!(
        "{},{},{},{},{},{},{}",
        i.field, i.x, i.y, i.ionomycin, i.sample, i.blank, row.influx
    )
}

pub fn summary_csv_header() -> &'static str {
    "file,threshold,influx,n,errors"
}

/// Mean influx is rounded to two decimals here and nowhere else; an empty
/// table leaves the column blank.
pub fn summary_csv_row(row: &SummaryRow) -> String {
    let mean = row
        .mean_influx
        .map(|m| format!("{m:.2}"))
        .unwrap_or_default();
    format!(
        "{},{},{},{},{}",
        row.file, row.threshold, mean, row.kept_count, row.error_count
    )
}

pub fn write_influx_csv(path: &Path, result: &SampleResult) -> Result<()> {
    let mut out = String::from(influx_csv_header());
    out.push('\n');
    for row in result.rows() {
        out.push_str(&influx_csv_row(row));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let mut out = String::from(summary_csv_header());
    out.push('\n');
    for row in rows {
        out.push_str(&summary_csv_row(row));
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))
}

/// Create `root/Results`, replacing an existing one only when `force` is set.
///
/// `root` itself must already exist; it is never created here.
pub fn prepare_results_dir(root: &Path, force: bool) -> Result<PathBuf> {
    if !root.is_dir() {
        bail!("Input root {} is not a readable directory", root.display());
    }
    let dir = root.join(RESULTS_DIR);
    if dir.exists() {
        if !force {
            bail!(
                "{} already exists; pass --force to replace the old results",
                dir.display()
            );
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("Failed to remove {}", dir.display()))?;
    }
    fs::create_dir(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Write one table per sample and threshold plus the combined summary.
/// Returns the paths written.
pub fn write_batch_results(results_dir: &Path, report: &BatchReport) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for sample in &report.samples {
        for result in &sample.results {
            let path = results_dir.join(format!("{}_at_{}.csv", sample.name, result.threshold));
            write_influx_csv(&path, result)?;
            written.push(path);
        }
    }
    let summary = results_dir.join("summary.csv");
    write_summary_csv(&summary, &report.summary())?;
    written.push(summary);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcium_core::pipeline::{FieldResult, IntensityRow, SampleOutcome, SampleReport};
    use calcium_core::io::PathReport;

    fn row(field: usize, influx: f64) -> InfluxRow {
        InfluxRow {
            intensities: IntensityRow {
                field,
                x: 45,
                y: 40,
                ionomycin: 1290,
                sample: 890,
                blank: 290,
            },
            influx,
        }
    }

    fn report() -> BatchReport {
        let result = SampleResult {
            threshold: 80,
            fields: vec![FieldResult {
                field: 0,
                rows: vec![row(0, 60.0), row(0, 100.0 / 3.0)],
                rejected: vec![],
            }],
        };
        BatchReport {
            samples: vec![SampleReport {
                name: "s1".to_string(),
                path: PathReport {
                    main: true,
                    ionomycin: true,
                    sample: true,
                    blank: true,
                },
                outcome: SampleOutcome::Analyzed,
                results: vec![result],
            }],
            cancelled: false,
        }
    }

    #[test]
    fn test_influx_row_format() {
        assert_eq!(influx_csv_row(&row(2, 60.0)), "2,45,40,1290,890,290,60");
    }

    #[test]
    fn test_summary_rounds_only_at_output() {
        let summary = report().summary();
        assert_eq!(summary_csv_row(&summary[0]), "s1,80,46.67,2,0");

        let empty = SummaryRow {
            file: "s2".to_string(),
            threshold: 100,
            mean_influx: None,
            kept_count: 0,
            error_count: 3,
        };
        assert_eq!(summary_csv_row(&empty), "s2,100,,0,3");
    }

    #[test]
    fn test_results_dir_requires_force() {
        let root = tempfile::tempdir().unwrap();
        let dir = prepare_results_dir(root.path(), false).unwrap();
        fs::write(dir.join("old.csv"), "x").unwrap();

        assert!(prepare_results_dir(root.path(), false).is_err());
        assert!(dir.join("old.csv").exists());

        prepare_results_dir(root.path(), true).unwrap();
        assert!(dir.is_dir());
        assert!(!dir.join("old.csv").exists());
    }

    #[test]
    fn test_results_dir_never_creates_the_root() {
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("typo_root");
        assert!(prepare_results_dir(&root, true).is_err());
        assert!(!root.exists());
    }

    #[test]
    fn test_write_batch_results() {
        let root = tempfile::tempdir().unwrap();
        let dir = prepare_results_dir(root.path(), false).unwrap();
        let written = write_batch_results(&dir, &report()).unwrap();
        assert_eq!(written, vec![dir.join("s1_at_80.csv"), dir.join("summary.csv")]);

        let table = fs::read_to_string(dir.join("s1_at_80.csv")).unwrap();
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], influx_csv_header());
        assert_eq!(lines[1], "0,45,40,1290,890,290,60");

        let summary = fs::read_to_string(dir.join("summary.csv")).unwrap();
        assert_eq!(summary, "file,threshold,influx,n,errors\ns1,80,46.67,2,0\n");
    }
}

use std::sync::Mutex;

use calcium_core::pipeline::{PipelineStage, ProgressReporter};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Two indicatif bars: one over samples × thresholds, one over the fields
/// of the stage in progress.
pub struct BarReporter {
    _multi: MultiProgress,
    overall: ProgressBar,
    stage: ProgressBar,
    thresholds: usize,
    current: Mutex<Current>,
}

#[derive(Default)]
struct Current {
    sample: String,
    stage: Option<PipelineStage>,
}

impl BarReporter {
    pub fn new(thresholds: usize) -> anyhow::Result<Self> {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(0));
        overall.set_style(
            ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40}] {pos}/{len} passes")?
                .progress_chars("=> "),
        );
        let stage = multi.add(ProgressBar::new(0));
        stage.set_style(
            ProgressStyle::default_bar()
                .template("  {msg:22} [{bar:40}] {pos}/{len} fields")?
                .progress_chars("=> "),
        );
        Ok(Self {
            _multi: multi,
            overall,
            stage,
            thresholds: thresholds.max(1),
            current: Mutex::new(Current::default()),
        })
    }

    pub fn finish(&self) {
        self.stage.finish_and_clear();
        self.overall.finish_with_message("Done");
    }
}

impl ProgressReporter for BarReporter {
    fn begin_sample(&self, name: &str, index: usize, total: usize) {
        self.overall.set_length((total * self.thresholds) as u64);
        self.overall.set_position((index * self.thresholds) as u64);
        self.overall.set_message(name.to_string());
        if let Ok(mut current) = self.current.lock() {
            current.sample = name.to_string();
            current.stage = None;
        }
    }

    fn begin_stage(&self, stage: PipelineStage, total_items: Option<usize>) {
        self.stage.reset();
        self.stage.set_length(total_items.unwrap_or(0) as u64);
        self.stage.set_message(stage.to_string());
        if let Ok(mut current) = self.current.lock() {
            current.stage = Some(stage);
            if let PipelineStage::Analysis { threshold } = stage {
                self.overall
                    .set_message(format!("{} @ {threshold}", current.sample));
            }
        }
    }

    fn advance(&self, items_done: usize) {
        self.stage.set_position(items_done as u64);
    }

    fn finish_stage(&self) {
        let analysed = self
            .current
            .lock()
            .map(|c| matches!(c.stage, Some(PipelineStage::Analysis { .. })))
            .unwrap_or(false);
        if analysed {
            self.overall.inc(1);
        }
    }
}

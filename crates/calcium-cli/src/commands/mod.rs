pub mod config;
pub mod info;
pub mod run;
pub mod sample;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calcium_core::pipeline::{parse_threshold_list, AnalysisConfig};
use clap::Args;

/// Analysis flags shared by `run` and `sample`.
///
/// Values given on the command line override the config file.
#[derive(Args)]
pub struct AnalysisArgs {
    /// Analysis config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Peak thresholds separated by '/', e.g. 80/100/120 (at most five)
    #[arg(short, long)]
    pub thresholds: Option<String>,

    /// Integration disk radius in pixels
    #[arg(short, long)]
    pub radius: Option<u32>,

    /// Upper influx bound in percent
    #[arg(long, allow_negative_numbers = true)]
    pub high: Option<i32>,

    /// Lower influx bound in percent
    #[arg(long, allow_negative_numbers = true)]
    pub low: Option<i32>,

    /// Border exclusion for detected peaks, in pixels
    #[arg(long)]
    pub margin: Option<usize>,
}

impl AnalysisArgs {
    pub fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid analysis config")?
        } else {
            AnalysisConfig::default()
        };

        if let Some(ref list) = self.thresholds {
            config.thresholds = parse_threshold_list(list);
        }
        if let Some(radius) = self.radius {
            config.radius = radius;
        }
        if let Some(high) = self.high {
            config.high = high;
        }
        if let Some(low) = self.low {
            config.low = low;
        }
        if let Some(margin) = self.margin {
            config.border_margin = margin;
        }
        Ok(config)
    }
}

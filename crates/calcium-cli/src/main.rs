mod commands;
mod progress;
mod report;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calcium", about = "Calcium influx quantification for TIRF image stacks")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse every sample under a root directory and write CSV results
    Run(commands::run::RunArgs),
    /// Analyse a single sample directory and print a summary
    Sample(commands::sample::SampleArgs),
    /// Check a sample directory layout and list its fields of view
    Info(commands::info::InfoArgs),
    /// Print or save the default analysis config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Sample(args) => commands::sample::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}

use std::path::PathBuf;

use anyhow::Result;
use calcium_core::io::{list_stack_files, SamplePaths};
use clap::Args;

#[derive(Args)]
pub struct InfoArgs {
    /// Sample directory holding Ionomycin, Sample and Blank
    pub dir: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let paths = SamplePaths::new(&args.dir);
    let report = paths.check();

    println!("Sample:      {}", args.dir.display());
    for (label, ok) in ["Main", "Ionomycin", "Sample", "Blank"]
        .iter()
        .zip(report.as_array())
    {
        println!("{:<13}{}", format!("{label}:"), if ok { "ok" } else { "missing" });
    }

    if !report.is_valid() {
        println!("Status:      path error with {}", report.missing_label());
        return Ok(());
    }

    let names = list_stack_files(&paths.ionomycin)?;
    println!("Fields:      {}", names.len());
    for name in &names {
        let complete = paths.sample.join(name).is_file() && paths.blank.join(name).is_file();
        if complete {
            println!("  {name}");
        } else {
            println!("  {name}  (no matching Sample/Blank stack)");
        }
    }

    Ok(())
}

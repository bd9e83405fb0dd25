use std::path::Path;

use calcium_core::pipeline::{AnalysisConfig, BatchReport, SampleOutcome, SampleResult};
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    good: Style,
    warn: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            good: Style::new().green(),
            warn: Style::new().yellow(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn rule(len: usize) -> String {
    "\u{2550}".repeat(len)
}

pub fn print_run_summary(root: &Path, config: &AnalysisConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Calcium Influx"));
    println!("  {}", s.title.apply_to(rule(14)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(root.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Thresholds"),
        s.value.apply_to(
            config
                .active_thresholds()
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("/")
        )
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Radius"),
        s.value.apply_to(format!("{} px", config.radius))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Bounds"),
        s.value.apply_to(format!("{}% .. {}%", config.low, config.high))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Margin"),
        s.value.apply_to(format!("{} px", config.border_margin))
    );
    println!();
}

pub fn print_batch_report(report: &BatchReport) {
    let s = Styles::new();

    println!();
    println!("  {}", s.header.apply_to("Results"));
    println!(
        "    {:<20}{:>10}{:>10}{:>8}{:>8}",
        s.label.apply_to("Sample"),
        s.label.apply_to("Threshold"),
        s.label.apply_to("Influx"),
        s.label.apply_to("n"),
        s.label.apply_to("Errors"),
    );
    for sample in &report.samples {
        match &sample.outcome {
            SampleOutcome::Skipped { missing } => {
                println!(
                    "    {:<20}{}",
                    s.value.apply_to(&sample.name),
                    s.disabled.apply_to(format!("skipped, path error with {missing}"))
                );
            }
            SampleOutcome::Failed { reason } if sample.results.is_empty() => {
                println!(
                    "    {:<20}{}",
                    s.value.apply_to(&sample.name),
                    s.warn.apply_to(format!("failed: {reason}"))
                );
            }
            _ => {
                for result in &sample.results {
                    print_result_line(&s, &sample.name, result);
                }
                match &sample.outcome {
                    SampleOutcome::Failed { reason } => println!(
                        "    {:<20}{}",
                        "",
                        s.warn.apply_to(format!("stopped: {reason}"))
                    ),
                    SampleOutcome::Cancelled if sample.results.is_empty() => println!(
                        "    {:<20}{}",
                        s.value.apply_to(&sample.name),
                        s.disabled.apply_to("cancelled before analysis")
                    ),
                    SampleOutcome::Cancelled => println!(
                        "    {:<20}{}",
                        "",
                        s.disabled.apply_to("cancelled, remaining thresholds not analysed")
                    ),
                    _ => {}
                }
            }
        }
    }
    if report.cancelled {
        println!();
        println!("  {}", s.warn.apply_to("Run stopped before all samples were done"));
    }
    println!();
}

pub fn print_sample_results(name: &str, fields: usize, results: &[SampleResult]) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(name));
    println!("  {}", s.title.apply_to(rule(name.chars().count().max(6))));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Fields"),
        s.value.apply_to(fields)
    );
    println!();

    for result in results {
        println!(
            "  {}",
            s.header.apply_to(format!("Threshold {}", result.threshold))
        );
        let mean = result
            .mean_influx()
            .map(|m| format!("{m:.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "    {:<14}{}",
            s.label.apply_to("Mean influx"),
            s.good.apply_to(mean)
        );
        println!(
            "    {:<14}{}",
            s.label.apply_to("Kept"),
            s.value.apply_to(result.kept_count())
        );
        println!(
            "    {:<14}{}",
            s.label.apply_to("Errors"),
            s.value.apply_to(result.error_count())
        );
        for field in result.fields.iter().filter(|f| f.error_count() > 0) {
            println!(
                "    {:<14}{}",
                s.label.apply_to(format!("field {}", field.field)),
                s.warn.apply_to(format!("{} error(s)", field.error_count()))
            );
        }
        println!();
    }
}

fn print_result_line(s: &Styles, name: &str, result: &SampleResult) {
    let mean = result
        .mean_influx()
        .map(|m| format!("{m:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());
    println!(
        "    {:<20}{:>10}{:>10}{:>8}{:>8}",
        s.value.apply_to(name),
        result.threshold,
        s.good.apply_to(mean),
        result.kept_count(),
        result.error_count(),
    );
}

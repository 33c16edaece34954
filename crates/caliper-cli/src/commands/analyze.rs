//! Analyze command - profile a data file and write its quality report.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use caliper::report::write_delimited;
use caliper::{AnalysisConfig, Caliper, QualityRules, Report};
use colored::Colorize;
use tracing::debug;

use super::sibling_path;
use crate::cli::ReportFormat;

pub struct AnalyzeArgs {
    pub file: PathBuf,
    pub rules: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub unique: Vec<String>,
    pub baseline: Option<PathBuf>,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub name: Option<String>,
    pub verbose: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        args.file.display().to_string().white()
    );

    let config = match &args.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    let rules = match &args.rules {
        Some(path) => QualityRules::load(path)?,
        None => QualityRules::new(),
    };
    debug!(rules = rules.len(), unique = args.unique.len(), "configuration loaded");

    let mut caliper = Caliper::with_config(config);
    for column in args.unique {
        caliper = caliper.with_unique(column);
    }
    if let Some(path) = &args.baseline {
        caliper = caliper.with_baseline(Report::load(path)?.profiles());
    }

    let (dataset, source) = caliper.load(&args.file)?;
    let name = args.name.unwrap_or_else(|| source.dataset_name());
    let report = caliper.analyze(name, &dataset, &rules)?;

    if args.verbose {
        println!();
        println!("{}", "Columns:".yellow().bold());
        for column in &report.columns {
            println!(
                "  {:24} {:8} completeness {:>6.2}  validity {:>6}  score {:>6.2}",
                column.name,
                column.schema.inferred_type.to_string(),
                column.score.completeness_pct,
                column
                    .score
                    .validity_pct
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".to_string()),
                column.score.overall_score
            );
        }
    }

    print_summary(&report);

    let output_path = args
        .output
        .unwrap_or_else(|| sibling_path(&args.file, &format!("quality.{}", args.format)));
    match args.format {
        ReportFormat::Json => fs::write(&output_path, report.to_json()?)?,
        ReportFormat::Csv => {
            let writer = BufWriter::new(File::create(&output_path)?);
            write_delimited(&report, writer, b',')?;
        }
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}

fn print_summary(report: &Report) {
    let summary = report.summary();

    println!();
    println!(
        "{} rows, {} columns",
        summary.row_count.to_string().white().bold(),
        summary.column_count.to_string().white().bold()
    );
    if summary.no_data {
        println!("{}", "Dataset has no rows - nothing to score".yellow());
        return;
    }

    if let Some(score) = summary.mean_overall_score {
        let text = format!("{:.2}", score);
        let colored = if score >= 90.0 {
            text.green()
        } else if score >= 70.0 {
            text.yellow()
        } else {
            text.red()
        };
        println!("Mean quality score: {}", colored.bold());
    }

    if summary.anomaly_count == 0 {
        println!("{}", "No anomalies found".green());
        return;
    }

    println!(
        "Found {} anomalies",
        summary.anomaly_count.to_string().red().bold()
    );
    for (anomaly_type, count) in &summary.anomalies_by_type {
        println!("  {:20} {}", anomaly_type.label(), count);
    }
    for finding in &report.anomalies {
        println!(
            "  {} {}: {}",
            "•".red(),
            finding.field.white().bold(),
            finding.reason
        );
    }
}

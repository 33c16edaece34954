//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Caliper: data quality profiling for delimited files
#[derive(Parser)]
#[command(name = "caliper")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file and write a quality report
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON object mapping column names to regex patterns
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// JSON analysis configuration (partial documents allowed)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Column expected to hold unique values (repeatable)
        #[arg(short, long = "unique", value_name = "COLUMN")]
        unique: Vec<String>,

        /// Prior JSON report to compare cardinality against
        #[arg(short, long)]
        baseline: Option<PathBuf>,

        /// Report format
        #[arg(short, long, default_value = "json")]
        format: ReportFormat,

        /// Output path for the report (default: <file>.quality.<format>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Dataset name shown in the report (default: file stem)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Build a data catalog with friendly names and descriptions
    Catalog {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the catalog (default: <file>.catalog.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use json or csv.", s)),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

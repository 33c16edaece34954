//! Caliper CLI - data quality reports for delimited files.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Analyze {
            file,
            rules,
            config,
            unique,
            baseline,
            format,
            output,
            name,
        } => commands::analyze::run(commands::analyze::AnalyzeArgs {
            file,
            rules,
            config,
            unique,
            baseline,
            format,
            output,
            name,
            verbose: cli.verbose,
        }),

        Commands::Catalog { file, output } => commands::catalog::run(file, output, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

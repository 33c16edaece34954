//! Catalog command - describe every column of a data file.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use caliper::{Caliper, Catalog, QualityRules, RuleBasedDescriber};
use colored::Colorize;

use super::sibling_path;

pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Cataloging".cyan().bold(),
        file.display().to_string().white()
    );

    let caliper = Caliper::new();
    let (dataset, source) = caliper.load(&file)?;
    let report = caliper.analyze(source.dataset_name(), &dataset, &QualityRules::new())?;
    let catalog = Catalog::build(&report, &dataset, &RuleBasedDescriber);

    if verbose {
        println!();
        for entry in &catalog.entries {
            println!(
                "  {:24} {:24} {}",
                entry.field,
                entry.friendly_name.yellow(),
                entry.description
            );
        }
    }

    let output_path = output.unwrap_or_else(|| sibling_path(&file, "catalog.csv"));
    let writer = BufWriter::new(File::create(&output_path)?);
    catalog.write_delimited(writer, b',')?;

    println!();
    println!(
        "Described {} columns",
        catalog.entries.len().to_string().white().bold()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}

//! Data catalog built on top of a finished report.
//!
//! The catalog decorates report columns with a friendly name and a short
//! business description. It reads the report and never changes it; describers
//! are pluggable through [`ColumnDescriber`].

use std::io::Write;

use csv::WriterBuilder;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::Dataset;
use crate::report::{Report, ReportColumn};
use crate::schema::{InferredType, name_tokens};

/// Produces human-facing wording for a column.
pub trait ColumnDescriber {
    /// Display name, e.g. `Customer Email` for `customerEmail`.
    fn friendly_name(&self, field: &str) -> String;

    /// One-sentence description of what the column holds.
    fn describe(&self, column: &ReportColumn) -> String;
}

/// Deterministic describer keyed on column-name tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedDescriber;

impl ColumnDescriber for RuleBasedDescriber {
    fn friendly_name(&self, field: &str) -> String {
        name_tokens(field)
            .iter()
            .map(|t| title_case(t))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn describe(&self, column: &ReportColumn) -> String {
        let tokens = name_tokens(&column.name);
        let Some(last) = tokens.last() else {
            return "Field describing the record.".to_string();
        };

        let has = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));
        let noun = tokens
            .iter()
            .filter(|t| t.as_str() != "id")
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");

        if last == "id" {
            let entity = if tokens.len() > 1 {
                tokens[..tokens.len() - 1].join(" ")
            } else {
                "record".to_string()
            };
            format!("Unique identifier for each {entity}.")
        } else if has(&["email"]) {
            format!("Email address of the {noun}.")
        } else if has(&["phone", "tel", "telephone"]) {
            format!("Telephone number associated with the {noun}.")
        } else if has(&["date", "timestamp"]) {
            format!("Date or time related to the {noun}.")
        } else if has(&["amount", "total", "price", "cost", "balance"]) {
            format!("Monetary amount representing the {noun}.")
        } else if has(&["qty", "quantity", "count", "number"]) {
            format!("Number of {noun}.")
        } else if has(&["status"]) {
            format!("Current status of the {noun}.")
        } else if has(&["flag"]) {
            format!("Indicator flag for the {noun}.")
        } else if has(&["type", "category"]) {
            format!("Classification type of the {noun}.")
        } else if has(&["code"]) {
            format!("Standard code representing the {noun}.")
        } else {
            format!("{} for each record.", self.friendly_name(&column.name))
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Catalog row for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub field: String,
    pub friendly_name: String,
    pub description: String,
    pub data_type: InferredType,
    /// The column has null or blank values.
    pub nullable: bool,
    /// First populated value.
    pub example: Option<String>,
}

/// Catalog of a dataset, one entry per report column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub dataset_name: String,
    pub entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn build(report: &Report, dataset: &Dataset, describer: &dyn ColumnDescriber) -> Self {
        let entries = report
            .columns
            .iter()
            .map(|column| {
                let example = dataset.column_index(&column.name).and_then(|i| {
                    dataset
                        .cells(i)
                        .find_map(|c| c.value())
                        .map(str::to_string)
                });
                let p = &column.profile;

                CatalogEntry {
                    field: column.name.clone(),
                    friendly_name: describer.friendly_name(&column.name),
                    description: describer.describe(column),
                    data_type: column.schema.inferred_type,
                    nullable: p.null_count + p.blank_count > 0,
                    example,
                }
            })
            .collect();

        Self {
            dataset_name: report.dataset_name.clone(),
            entries,
        }
    }

    /// Write one delimited row per entry, with a header.
    pub fn write_delimited<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut wtr = WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Caliper;
    use crate::rules::QualityRules;

    fn describe(name: &str) -> String {
        let ds = Dataset::new(vec![name.to_string()], vec![vec![Some("x".into())]]).unwrap();
        let report = Caliper::new().analyze("t", &ds, &QualityRules::new()).unwrap();
        RuleBasedDescriber.describe(&report.columns[0])
    }

    #[test]
    fn test_friendly_name() {
        assert_eq!(RuleBasedDescriber.friendly_name("customer_id"), "Customer Id");
        assert_eq!(RuleBasedDescriber.friendly_name("orderDate"), "Order Date");
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(describe("customer_id"), "Unique identifier for each customer.");
        assert_eq!(describe("id"), "Unique identifier for each record.");
        assert_eq!(describe("contact_email"), "Email address of the contact email.");
        assert_eq!(describe("order_total"), "Monetary amount representing the order total.");
        assert_eq!(describe("Status"), "Current status of the status.");
        assert_eq!(describe("nickname"), "Nickname for each record.");
    }

    #[test]
    fn test_build_catalog() {
        let ds = Dataset::new(
            vec!["customer_id".into(), "email".into()],
            vec![
                vec![Some("1".into()), None],
                vec![Some("2".into()), Some(" a@x.com ".into())],
            ],
        )
        .unwrap();
        let report = Caliper::new().analyze("t", &ds, &QualityRules::new()).unwrap();
        let catalog = Catalog::build(&report, &ds, &RuleBasedDescriber);

        assert_eq!(catalog.entries.len(), 2);
        let email = &catalog.entries[1];
        assert!(email.nullable);
        assert_eq!(email.example.as_deref(), Some("a@x.com"));
        assert_eq!(email.data_type, InferredType::EmailLike);
        assert!(!catalog.entries[0].nullable);

        let mut out = Vec::new();
        catalog.write_delimited(&mut out, b',').unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("field,friendly_name,description,data_type,nullable,example"));
        assert!(text.contains("email_like"));
    }
}

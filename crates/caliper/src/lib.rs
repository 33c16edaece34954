//! Caliper: deterministic data quality reports for tabular datasets.
//!
//! Caliper turns a dataset into a quality report in five column-parallel
//! stages: schema inference, profiling, rule evaluation, quality scoring and
//! anomaly detection. The stages are pure functions of the dataset, the
//! configuration and the rule set; the report is the only output.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same input and configuration give the same report
//! - **Fail soft**: a problem in one column degrades that column only
//! - **Explained**: every anomaly carries the statistic that triggered it
//!
//! # Example
//!
//! ```no_run
//! use caliper::{Caliper, QualityRules};
//!
//! let caliper = Caliper::new().with_unique("customer_id");
//! let result = caliper.analyze_file("customers.csv", &QualityRules::new()).unwrap();
//!
//! println!("Columns: {}", result.report.columns.len());
//! println!("Anomalies: {}", result.report.anomalies.len());
//! ```

pub mod anomaly;
pub mod catalog;
pub mod error;
pub mod inference;
pub mod input;
pub mod profile;
pub mod quality;
pub mod report;
pub mod rules;
pub mod schema;
pub mod values;

mod caliper;
mod parallel;

pub use crate::caliper::{
    AnalysisConfig, AnalysisResult, Caliper, Clock, FixedClock, SystemClock, assemble_report,
    detect_anomalies, evaluate_rules, infer_schema, profile, score_quality,
};
pub use anomaly::{AnomalyConfig, AnomalyFinding, AnomalyType, TailDirection};
pub use catalog::{Catalog, CatalogEntry, ColumnDescriber, RuleBasedDescriber};
pub use error::{CaliperError, Result};
pub use input::{Dataset, Parser, SourceMetadata};
pub use profile::ColumnProfile;
pub use quality::{ColumnQualityScore, UniqueHints};
pub use report::{Report, ReportColumn, ReportSummary};
pub use rules::{QualityRules, ValidityResult};
pub use schema::{ColumnSchema, InferredType};

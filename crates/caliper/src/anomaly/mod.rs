//! Anomaly detection: outliers, pattern violations, implausible ranges,
//! duplicate keys, cardinality shift and missing values.

mod config;
mod detector;
mod finding;
mod rules;

pub use config::{AmountBounds, AnomalyConfig, DateBounds, EnabledRules, OutlierMethod};
pub use detector::AnomalyDetector;
pub use finding::{AnomalyFinding, AnomalyType, FindingEvidence, TailDirection};
pub use rules::{
    CardinalityShiftRule, ColumnContext, DetectionRule, DuplicateKeyRule, MissingValuesRule,
    OutOfRangeRule, PatternViolationRule, StatisticalOutlierRule, rules_from_config,
};

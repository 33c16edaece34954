//! Runs the detection rules over every column.

use tracing::debug;

use crate::input::Dataset;
use crate::parallel;
use crate::profile::ColumnProfile;
use crate::quality::ColumnQualityScore;

use super::config::AnomalyConfig;
use super::finding::AnomalyFinding;
use super::rules::{ColumnContext, DetectionRule, rules_from_config};

/// Column-parallel anomaly detection.
///
/// Findings are ordered by column, then by rule: statistical outliers,
/// pattern violations, out-of-range values, duplicate keys, cardinality shift,
/// missing values.
pub struct AnomalyDetector {
    rules: Vec<Box<dyn DetectionRule>>,
}

impl AnomalyDetector {
    /// Create a detector with all default rules.
    pub fn new() -> Self {
        Self::with_config(&AnomalyConfig::default())
    }

    pub fn with_config(config: &AnomalyConfig) -> Self {
        Self {
            rules: rules_from_config(config),
        }
    }

    /// Replace the rule set.
    pub fn with_rules(rules: Vec<Box<dyn DetectionRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Detect anomalies for every profiled column present in the dataset.
    ///
    /// `baseline` holds a prior run's profiles, matched by column name.
    pub fn detect(
        &self,
        dataset: &Dataset,
        profiles: &[ColumnProfile],
        scores: &[ColumnQualityScore],
        baseline: Option<&[ColumnProfile]>,
    ) -> Vec<AnomalyFinding> {
        let per_column = parallel::map_columns(profiles.len(), |i| {
            let profile = &profiles[i];
            let Some(index) = dataset.column_index(&profile.name) else {
                debug!(column = %profile.name, "profiled column missing from dataset, skipping");
                return Vec::new();
            };
            let score = scores.iter().find(|s| s.name == profile.name);
            let prior = baseline.and_then(|b| b.iter().find(|p| p.name == profile.name));

            let ctx = ColumnContext::new(dataset, index, profile, score, prior);
            self.rules
                .iter()
                .filter_map(|rule| {
                    let finding = rule.detect(&ctx);
                    if finding.is_some() {
                        debug!(column = %profile.name, rule = rule.name(), "anomaly detected");
                    }
                    finding
                })
                .collect::<Vec<_>>()
        });

        per_column.into_iter().flatten().collect()
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyType;
    use crate::inference::SchemaInferencer;
    use crate::profile::ColumnProfiler;
    use crate::quality::{QualityScorer, UniqueHints};
    use crate::rules::{QualityRules, RuleEvaluator};

    fn run(dataset: &Dataset, hints: &UniqueHints, detector: &AnomalyDetector) -> Vec<AnomalyFinding> {
        let schemas = SchemaInferencer::new().infer(dataset);
        let profiles = ColumnProfiler::new().profile(dataset, &schemas);
        let validity = RuleEvaluator::new().evaluate(dataset, &profiles, &QualityRules::new());
        let scores = QualityScorer::new().score(&profiles, &validity, hints);
        detector.detect(dataset, &profiles, &scores, None)
    }

    fn dataset(columns: &[&str], rows: &[&[Option<&str>]]) -> Dataset {
        Dataset::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.map(String::from)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_findings_follow_column_then_rule_order() {
        let ds = dataset(
            &["email", "amount"],
            &[
                &[Some("a@x.com"), Some("10")],
                &[Some("bad"), Some("12")],
                &[Some("c@y.com"), Some("11")],
                &[None, Some("9")],
                &[Some("d@z.com"), Some("1000")],
            ],
        );
        let findings = run(&ds, &UniqueHints::new(), &AnomalyDetector::new());
        let order: Vec<(&str, AnomalyType)> = findings
            .iter()
            .map(|f| (f.field.as_str(), f.anomaly_type))
            .collect();

        assert_eq!(
            order,
            vec![
                ("email", AnomalyType::PatternViolation),
                ("email", AnomalyType::MissingValues),
                ("amount", AnomalyType::StatisticalOutlier),
            ]
        );
    }

    #[test]
    fn test_disabled_rules_do_not_run() {
        let ds = dataset(&["id"], &[&[Some("1")], &[Some("1")], &[None]]);
        let hints: UniqueHints = ["id"].into_iter().collect();

        let mut config = AnomalyConfig::default();
        config.rules.duplicate_key = false;
        config.rules.missing_values = false;
        let findings = run(&ds, &hints, &AnomalyDetector::with_config(&config));
        assert!(findings.is_empty());

        let findings = run(&ds, &hints, &AnomalyDetector::new());
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn test_empty_dataset_has_no_findings() {
        let ds = dataset(&["a", "b"], &[]);
        assert!(run(&ds, &UniqueHints::new(), &AnomalyDetector::new()).is_empty());
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(AnomalyDetector::new().rule_names().len(), 6);
        assert!(AnomalyDetector::with_rules(Vec::new()).rule_names().is_empty());
    }
}

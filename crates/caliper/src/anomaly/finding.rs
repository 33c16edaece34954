//! Anomaly finding types.

use serde::{Deserialize, Serialize};

/// Kind of anomaly detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    /// Values far from the column's centre.
    StatisticalOutlier,
    /// Validity below the configured floor.
    PatternViolation,
    /// Dates or amounts outside a plausible range.
    OutOfRange,
    /// Repeated values in a column expected to be unique.
    DuplicateKey,
    /// Distinct ratio moved away from the baseline run.
    CardinalityShift,
    /// Completeness below the configured floor.
    MissingValues,
}

impl AnomalyType {
    pub const ALL: [AnomalyType; 6] = [
        AnomalyType::StatisticalOutlier,
        AnomalyType::PatternViolation,
        AnomalyType::OutOfRange,
        AnomalyType::DuplicateKey,
        AnomalyType::CardinalityShift,
        AnomalyType::MissingValues,
    ];

    /// Get a human-readable label for the anomaly type.
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyType::StatisticalOutlier => "Statistical Outlier",
            AnomalyType::PatternViolation => "Pattern Violation",
            AnomalyType::OutOfRange => "Out of Range",
            AnomalyType::DuplicateKey => "Duplicate Key",
            AnomalyType::CardinalityShift => "Cardinality Shift",
            AnomalyType::MissingValues => "Missing Values",
        }
    }

    /// Fixed remediation text for this kind of anomaly.
    pub fn recommendation(&self) -> &'static str {
        match self {
            AnomalyType::StatisticalOutlier => "Winsorize, robust scale, or verify source",
            AnomalyType::PatternViolation => "Validate with regex & cleanse source",
            AnomalyType::OutOfRange => "Clip to plausible bounds or correct at source",
            AnomalyType::DuplicateKey => "Deduplicate or add a key",
            AnomalyType::CardinalityShift => {
                "Compare against the previous extract and confirm upstream changes"
            }
            AnomalyType::MissingValues => "Impute, drop or enforce NOT NULL",
        }
    }
}

/// Which side of the distribution the flagged values lie on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TailDirection {
    High,
    Low,
    Both,
}

impl TailDirection {
    /// Direction from counts of values above and below the expected range.
    pub fn from_counts(high: usize, low: usize) -> Option<Self> {
        match (high > 0, low > 0) {
            (true, true) => Some(TailDirection::Both),
            (true, false) => Some(TailDirection::High),
            (false, true) => Some(TailDirection::Low),
            (false, false) => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TailDirection::High => "high",
            TailDirection::Low => "low",
            TailDirection::Both => "both",
        }
    }
}

/// Numbers behind a finding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FindingEvidence {
    /// Rows (or groups, for duplicate keys) affected.
    pub affected_count: usize,
    /// Affected rows as a percentage of the column's rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// The triggering statistic (z-score, validity, ratio delta, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<f64>,
    /// Threshold the statistic was compared against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tail: Option<TailDirection>,
}

impl FindingEvidence {
    pub fn new(affected_count: usize) -> Self {
        Self {
            affected_count,
            ..Self::default()
        }
    }

    pub fn with_percentage(mut self, pct: f64) -> Self {
        self.percentage = Some(pct);
        self
    }

    pub fn with_statistic(mut self, statistic: f64) -> Self {
        self.statistic = Some(statistic);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn with_tail(mut self, tail: TailDirection) -> Self {
        self.tail = Some(tail);
        self
    }
}

/// One anomaly in one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFinding {
    /// Column the anomaly was found in.
    pub field: String,
    pub anomaly_type: AnomalyType,
    /// Explanation embedding the triggering statistic.
    pub reason: String,
    /// From [`AnomalyType::recommendation`].
    pub recommendation: String,
    pub evidence: FindingEvidence,
}

impl AnomalyFinding {
    pub fn new(field: impl Into<String>, anomaly_type: AnomalyType, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            anomaly_type,
            reason: reason.into(),
            recommendation: anomaly_type.recommendation().to_string(),
            evidence: FindingEvidence::default(),
        }
    }

    pub fn with_evidence(mut self, evidence: FindingEvidence) -> Self {
        self.evidence = evidence;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_comes_from_type() {
        let f = AnomalyFinding::new("c", AnomalyType::DuplicateKey, "dupes");
        assert_eq!(f.recommendation, "Deduplicate or add a key");
        for t in AnomalyType::ALL {
            assert!(!t.recommendation().is_empty());
        }
    }

    #[test]
    fn test_tail_direction() {
        assert_eq!(TailDirection::from_counts(1, 0), Some(TailDirection::High));
        assert_eq!(TailDirection::from_counts(0, 2), Some(TailDirection::Low));
        assert_eq!(TailDirection::from_counts(1, 1), Some(TailDirection::Both));
        assert_eq!(TailDirection::from_counts(0, 0), None);
    }

    #[test]
    fn test_serializes_snake_case() {
        let json = serde_json::to_string(&AnomalyType::StatisticalOutlier).unwrap();
        assert_eq!(json, "\"statistical_outlier\"");
        let json = serde_json::to_string(&TailDirection::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}

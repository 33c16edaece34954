//! Completeness, uniqueness and validity folded into one score per column.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::parallel;
use crate::profile::ColumnProfile;
use crate::rules::{ValidityResult, ValidityStatus};
use crate::values::round2;

use super::score::{ColumnQualityScore, UniqueHints};

/// Weights of the overall score. Components that are not applicable drop out
/// of the mean along with their weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub completeness_weight: f64,
    pub validity_weight: f64,
    /// Only used for columns expected to be unique.
    pub uniqueness_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            completeness_weight: 1.0,
            validity_weight: 1.0,
            uniqueness_weight: 1.0,
        }
    }
}

pub struct QualityScorer {
    config: ScoringConfig,
}

impl QualityScorer {
    pub fn new() -> Self {
        Self::with_config(ScoringConfig::default())
    }

    pub fn with_config(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Score every profiled column, in profile order.
    pub fn score(
        &self,
        profiles: &[ColumnProfile],
        validity: &[ValidityResult],
        hints: &UniqueHints,
    ) -> Vec<ColumnQualityScore> {
        parallel::map_columns(profiles.len(), |i| {
            let profile = &profiles[i];
            let result = validity.iter().find(|v| v.name == profile.name);
            if result.is_none() {
                debug!(column = %profile.name, "no validity result, scoring without validity");
            }
            self.score_column(profile, result, hints.contains(&profile.name))
        })
    }

    pub fn score_column(
        &self,
        profile: &ColumnProfile,
        validity: Option<&ValidityResult>,
        expected_unique: bool,
    ) -> ColumnQualityScore {
        let mut warnings = Vec::new();
        if let Some(v) = validity.filter(|v| v.status == ValidityStatus::RuleError) {
            warnings.extend(v.warning.clone());
        }
        let rule = validity.and_then(|v| v.rule.clone());

        if !profile.has_data() {
            return ColumnQualityScore {
                name: profile.name.clone(),
                completeness_pct: 0.0,
                uniqueness_pct: None,
                validity_pct: None,
                invalid_count: None,
                overall_score: 0.0,
                expected_unique,
                no_data: true,
                rule,
                warnings,
            };
        }

        // Components enter the mean unrounded; only the mean is rounded.
        let raw_completeness = raw_pct(profile.populated_count(), profile.total_count);
        let raw_uniqueness = if expected_unique {
            raw_pct(profile.distinct_count, profile.populated_count())
        } else {
            None
        };
        let scored = validity.filter(|v| v.is_scored());
        let validity_pct = scored.and_then(|v| v.validity_pct);
        let invalid_count = scored.map(|v| v.checked - v.matched);
        let raw_validity = scored.and_then(|v| {
            if v.checked > 0 {
                raw_pct(v.matched, v.checked)
            } else {
                v.validity_pct
            }
        });

        let completeness_pct = raw_completeness.map_or(0.0, round2);
        let uniqueness_pct = raw_uniqueness.map(round2);

        let components = [
            (raw_completeness, self.config.completeness_weight),
            (raw_validity, self.config.validity_weight),
            (raw_uniqueness, self.config.uniqueness_weight),
        ];
        let (weighted, weights) = components
            .iter()
            .filter_map(|(pct, w)| pct.map(|p| (p * w, *w)))
            .fold((0.0, 0.0), |(s, t), (x, w)| (s + x, t + w));

        let overall_score = if weights > 0.0 {
            round2((weighted / weights).clamp(0.0, 100.0))
        } else {
            completeness_pct
        };

        ColumnQualityScore {
            name: profile.name.clone(),
            completeness_pct,
            uniqueness_pct,
            validity_pct,
            invalid_count,
            overall_score,
            expected_unique,
            no_data: false,
            rule,
            warnings,
        }
    }
}

/// `part / whole` as an unrounded percentage in [0, 100].
fn raw_pct(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| (part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0))
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::InferredType;

    fn profile(total: usize, nulls: usize, blanks: usize, distinct: usize) -> ColumnProfile {
        ColumnProfile {
            name: "c".to_string(),
            inferred_type: InferredType::Text,
            total_count: total,
            null_count: nulls,
            blank_count: blanks,
            distinct_count: distinct,
            unparsed_count: 0,
            numeric: None,
            date_range: None,
            text: None,
        }
    }

    fn validity(pct: Option<f64>, status: ValidityStatus) -> ValidityResult {
        ValidityResult {
            name: "c".to_string(),
            rule: None,
            checked: 0,
            matched: 0,
            validity_pct: pct,
            status,
            warning: (status == ValidityStatus::RuleError).then(|| "bad pattern".to_string()),
        }
    }

    #[test]
    fn test_completeness_and_validity_mean() {
        let v = validity(Some(50.0), ValidityStatus::Scored);
        let s = QualityScorer::new().score_column(&profile(4, 1, 0, 3), Some(&v), false);

        assert_eq!(s.completeness_pct, 75.0);
        assert_eq!(s.validity_pct, Some(50.0));
        assert_eq!(s.uniqueness_pct, None);
        assert_eq!(s.overall_score, 62.5);
        assert_eq!(s.invalid_count, Some(0));
    }

    #[test]
    fn test_overall_score_rounds_once() {
        let v = ValidityResult {
            checked: 3,
            matched: 1,
            ..validity(Some(33.33), ValidityStatus::Scored)
        };
        let s = QualityScorer::new().score_column(&profile(3, 0, 0, 1), Some(&v), true);

        assert_eq!(s.completeness_pct, 100.0);
        assert_eq!(s.validity_pct, Some(33.33));
        assert_eq!(s.uniqueness_pct, Some(33.33));
        assert_eq!(s.invalid_count, Some(2));
        assert_eq!(s.overall_score, 55.56);
    }

    #[test]
    fn test_uniqueness_only_when_expected() {
        let p = profile(4, 0, 0, 3);
        let v = validity(Some(100.0), ValidityStatus::Scored);
        let scorer = QualityScorer::new();

        let plain = scorer.score_column(&p, Some(&v), false);
        assert_eq!(plain.overall_score, 100.0);

        let unique = scorer.score_column(&p, Some(&v), true);
        assert_eq!(unique.uniqueness_pct, Some(75.0));
        assert_eq!(unique.overall_score, 91.67);
    }

    #[test]
    fn test_all_distinct_unique_column_is_100() {
        let s = QualityScorer::new().score_column(&profile(3, 1, 0, 2), None, true);
        assert_eq!(s.uniqueness_pct, Some(100.0));
    }

    #[test]
    fn test_rule_error_excludes_validity_and_warns() {
        let v = validity(None, ValidityStatus::RuleError);
        let s = QualityScorer::new().score_column(&profile(4, 2, 0, 2), Some(&v), false);

        assert_eq!(s.validity_pct, None);
        assert_eq!(s.overall_score, 50.0);
        assert_eq!(s.warnings, vec!["bad pattern".to_string()]);
    }

    #[test]
    fn test_zero_rows_is_no_data() {
        let v = validity(None, ValidityStatus::NotApplicable);
        let s = QualityScorer::new().score_column(&profile(0, 0, 0, 0), Some(&v), true);

        assert!(s.no_data);
        assert_eq!(s.completeness_pct, 0.0);
        assert_eq!(s.overall_score, 0.0);
        assert_eq!(s.uniqueness_pct, None);
    }

    #[test]
    fn test_weights() {
        let scorer = QualityScorer::with_config(ScoringConfig {
            completeness_weight: 3.0,
            validity_weight: 1.0,
            uniqueness_weight: 0.0,
        });
        let v = validity(Some(0.0), ValidityStatus::Scored);
        let s = scorer.score_column(&profile(10, 0, 0, 10), Some(&v), false);
        assert_eq!(s.overall_score, 75.0);
    }

    #[test]
    fn test_score_matches_profiles_by_name() {
        let profiles = vec![profile(2, 0, 0, 2)];
        let hints: UniqueHints = ["c"].into_iter().collect();
        let scores = QualityScorer::new().score(&profiles, &[], &hints);
        assert!(scores[0].expected_unique);
        assert_eq!(scores[0].overall_score, 100.0);
    }
}

//! Detection rules.
//!
//! Each rule looks at one column at a time and reports at most one
//! aggregated finding for it.

use std::collections::HashMap;

use tracing::debug;

use crate::input::Dataset;
use crate::profile::{ColumnProfile, NumericSummary, percentile};
use crate::quality::ColumnQualityScore;
use crate::rules::RuleSource;
use crate::schema::InferredType;
use crate::values::{from_epoch_days, numeric_value, percentage, round2, to_epoch_days};

use super::config::{AmountBounds, AnomalyConfig, DateBounds, OutlierMethod};
use super::finding::{AnomalyFinding, AnomalyType, FindingEvidence, TailDirection};

/// Consistency constant relating MAD to the standard deviation of a normal
/// distribution.
const MAD_SCALE: f64 = 1.4826;
/// Same, for the mean absolute deviation.
const MEAN_AD_SCALE: f64 = 1.2533;

/// Everything a rule may look at for one column.
pub struct ColumnContext<'a> {
    pub dataset: &'a Dataset,
    pub index: usize,
    pub profile: &'a ColumnProfile,
    pub score: Option<&'a ColumnQualityScore>,
    pub baseline: Option<&'a ColumnProfile>,
    /// Parsed values in row order; empty for non-numeric columns.
    pub values: Vec<f64>,
}

impl<'a> ColumnContext<'a> {
    pub fn new(
        dataset: &'a Dataset,
        index: usize,
        profile: &'a ColumnProfile,
        score: Option<&'a ColumnQualityScore>,
        baseline: Option<&'a ColumnProfile>,
    ) -> Self {
        let values = if profile.inferred_type.is_numeric() {
            dataset
                .cells(index)
                .filter_map(|c| c.value())
                .filter_map(|v| numeric_value(v, profile.inferred_type))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            dataset,
            index,
            profile,
            score,
            baseline,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Percentage of the column's rows.
    fn row_pct(&self, count: usize) -> f64 {
        percentage(count, self.profile.total_count).unwrap_or(0.0)
    }
}

/// A single anomaly check.
pub trait DetectionRule: Send + Sync {
    /// Stable identifier, used in logs.
    fn name(&self) -> &'static str;

    fn anomaly_type(&self) -> AnomalyType;

    /// Check one column.
    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding>;
}

/// Build the enabled rules in evaluation order.
pub fn rules_from_config(config: &AnomalyConfig) -> Vec<Box<dyn DetectionRule>> {
    let mut rules: Vec<Box<dyn DetectionRule>> = Vec::new();
    let enabled = &config.rules;

    if enabled.statistical_outlier {
        rules.push(Box::new(StatisticalOutlierRule {
            threshold: config.z_score_threshold,
            method: config.outlier_method,
            tail_percentile: config.high_tail_percentile,
            min_values: config.min_numeric_values,
        }));
    }
    if enabled.pattern_violation {
        rules.push(Box::new(PatternViolationRule {
            floor: config.validity_floor,
        }));
    }
    if enabled.out_of_range {
        rules.push(Box::new(OutOfRangeRule {
            iqr_multiplier: config.iqr_multiplier,
            amount_bounds: config.amount_bounds.clone(),
            date_bounds: config.date_bounds.clone(),
            allow_negative_amounts: config.allow_negative_amounts,
        }));
    }
    if enabled.duplicate_key {
        rules.push(Box::new(DuplicateKeyRule {
            threshold: config.duplicate_key_threshold,
        }));
    }
    if enabled.cardinality_shift {
        rules.push(Box::new(CardinalityShiftRule {
            delta: config.cardinality_delta,
        }));
    }
    if enabled.missing_values {
        rules.push(Box::new(MissingValuesRule {
            floor: config.completeness_floor,
        }));
    }

    rules
}

// =============================================================================
// STATISTICAL OUTLIERS
// =============================================================================

/// Values far from the centre of a numeric column, in one finding per column.
pub struct StatisticalOutlierRule {
    pub threshold: f64,
    pub method: OutlierMethod,
    pub tail_percentile: f64,
    pub min_values: usize,
}

impl StatisticalOutlierRule {
    /// Centre and scale for z-scores, `None` when the spread is zero.
    fn centre_and_scale(&self, values: &[f64], stats: &NumericSummary) -> Option<(f64, f64)> {
        match self.method {
            OutlierMethod::Classic => (stats.std_dev > 0.0).then_some((stats.mean, stats.std_dev)),
            OutlierMethod::Robust => {
                let median = stats.median;
                let mut deviations: Vec<f64> = values.iter().map(|v| (v - median).abs()).collect();
                deviations.sort_by(f64::total_cmp);

                let mad = percentile(&deviations, 50.0);
                let scale = if mad > 0.0 {
                    MAD_SCALE * mad
                } else {
                    let mean_ad = deviations.iter().sum::<f64>() / deviations.len() as f64;
                    MEAN_AD_SCALE * mean_ad
                };
                (scale > 0.0).then_some((median, scale))
            }
        }
    }
}

impl DetectionRule for StatisticalOutlierRule {
    fn name(&self) -> &'static str {
        "statistical_outlier"
    }

    fn anomaly_type(&self) -> AnomalyType {
        AnomalyType::StatisticalOutlier
    }

    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding> {
        if ctx.profile.inferred_type != InferredType::Numeric {
            return None;
        }
        let stats = ctx.profile.numeric.as_ref()?;
        if ctx.values.len() < self.min_values.max(1) {
            return None;
        }
        if stats.std_dev == 0.0 {
            debug!(column = ctx.name(), "zero variance, skipping outlier check");
            return None;
        }
        let (centre, scale) = self.centre_and_scale(&ctx.values, stats)?;

        let mut high = 0;
        let mut low = 0;
        let mut max_abs_z: f64 = 0.0;
        for &v in &ctx.values {
            let z = (v - centre) / scale;
            if z > self.threshold {
                high += 1;
            } else if z < -self.threshold {
                low += 1;
            }
            max_abs_z = max_abs_z.max(z.abs());
        }
        let tail = TailDirection::from_counts(high, low)?;
        let flagged = high + low;
        let pct = ctx.row_pct(flagged);

        let mut sorted = ctx.values.clone();
        sorted.sort_by(f64::total_cmp);
        let upper = percentile(&sorted, self.tail_percentile);
        let lower = percentile(&sorted, 100.0 - self.tail_percentile);
        let quantile = match tail {
            TailDirection::High => format!("p{} = {:.2}", self.tail_percentile, upper),
            TailDirection::Low => format!("p{} = {:.2}", round2(100.0 - self.tail_percentile), lower),
            TailDirection::Both => format!(
                "p{} = {:.2}, p{} = {:.2}",
                round2(100.0 - self.tail_percentile),
                lower,
                self.tail_percentile,
                upper
            ),
        };
        let (centre_name, z_name) = match self.method {
            OutlierMethod::Robust => ("median", "robust z-score"),
            OutlierMethod::Classic => ("mean", "z-score"),
        };

        Some(
            AnomalyFinding::new(
                ctx.name(),
                AnomalyType::StatisticalOutlier,
                format!(
                    "{flagged} of {} rows ({pct:.2}%) lie beyond {}σ from the {centre_name} \
                     ({z_name} up to {:.2}, {} tail; {quantile})",
                    ctx.profile.total_count,
                    self.threshold,
                    max_abs_z,
                    tail.label(),
                ),
            )
            .with_evidence(
                FindingEvidence::new(flagged)
                    .with_percentage(pct)
                    .with_statistic(round2(max_abs_z))
                    .with_threshold(self.threshold)
                    .with_tail(tail),
            ),
        )
    }
}

// =============================================================================
// PATTERN VIOLATIONS
// =============================================================================

/// Validity below the floor, for columns checked against a default or
/// assigned pattern. Blank text is left to [`MissingValuesRule`].
pub struct PatternViolationRule {
    pub floor: f64,
}

impl DetectionRule for PatternViolationRule {
    fn name(&self) -> &'static str {
        "pattern_violation"
    }

    fn anomaly_type(&self) -> AnomalyType {
        AnomalyType::PatternViolation
    }

    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding> {
        let score = ctx.score?;
        let validity = score.validity_pct?;
        let rule = score.rule.as_ref()?;
        if matches!(rule, RuleSource::NonEmpty) || validity >= self.floor {
            return None;
        }

        let invalid = score.invalid_count.unwrap_or(0);
        let invalid_pct = round2(100.0 - validity);

        Some(
            AnomalyFinding::new(
                ctx.name(),
                AnomalyType::PatternViolation,
                format!(
                    "{invalid} of {} non-null values ({invalid_pct:.2}%) violate the {rule}; \
                     validity {validity:.2}% is below {:.2}%",
                    ctx.profile.non_null_count(),
                    self.floor,
                ),
            )
            .with_evidence(
                FindingEvidence::new(invalid)
                    .with_percentage(ctx.row_pct(invalid))
                    .with_statistic(validity)
                    .with_threshold(self.floor),
            ),
        )
    }
}

// =============================================================================
// OUT OF RANGE
// =============================================================================

/// Dates or amounts outside a plausible range.
pub struct OutOfRangeRule {
    pub iqr_multiplier: f64,
    pub amount_bounds: Option<AmountBounds>,
    pub date_bounds: Option<DateBounds>,
    pub allow_negative_amounts: bool,
}

impl OutOfRangeRule {
    /// Tukey fences, or `None` when the quartiles coincide.
    fn fences(&self, stats: &NumericSummary) -> Option<(f64, f64)> {
        let iqr = stats.iqr();
        (iqr > 0.0).then(|| {
            (
                stats.q1 - self.iqr_multiplier * iqr,
                stats.q3 + self.iqr_multiplier * iqr,
            )
        })
    }

    fn bounds(&self, ctx: &ColumnContext<'_>) -> (Option<f64>, Option<f64>) {
        let stats = ctx.profile.numeric.as_ref();
        let derived = stats.and_then(|s| self.fences(s));

        match ctx.profile.inferred_type {
            InferredType::AmountLike => {
                let (min, max) = match &self.amount_bounds {
                    Some(b) => (b.min, b.max),
                    None => (derived.map(|d| d.0), derived.map(|d| d.1)),
                };
                let min = if self.allow_negative_amounts {
                    min
                } else {
                    Some(min.map_or(0.0, |m| m.max(0.0)))
                };
                (min, max)
            }
            InferredType::Date => match &self.date_bounds {
                Some(b) => (b.earliest.map(to_epoch_days), b.latest.map(to_epoch_days)),
                None => (derived.map(|d| d.0), derived.map(|d| d.1)),
            },
            _ => (None, None),
        }
    }
}

impl DetectionRule for OutOfRangeRule {
    fn name(&self) -> &'static str {
        "out_of_range"
    }

    fn anomaly_type(&self) -> AnomalyType {
        AnomalyType::OutOfRange
    }

    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding> {
        let is_date = match ctx.profile.inferred_type {
            InferredType::Date => true,
            InferredType::AmountLike => false,
            _ => return None,
        };

        let (min, max) = self.bounds(ctx);
        if min.is_none() && max.is_none() {
            return None;
        }

        let low = ctx.values.iter().filter(|&&v| min.is_some_and(|m| v < m)).count();
        let high = ctx.values.iter().filter(|&&v| max.is_some_and(|m| v > m)).count();
        let tail = TailDirection::from_counts(high, low)?;
        let flagged = high + low;
        let pct = ctx.row_pct(flagged);

        let render = |bound: Option<f64>| match (bound, is_date) {
            (None, _) => "unbounded".to_string(),
            (Some(b), true) => from_epoch_days(b).map_or_else(|| format!("{b:.0}"), |d| d.to_string()),
            (Some(b), false) => format!("{b:.2}"),
        };
        let noun = if is_date { "dates" } else { "amounts" };

        Some(
            AnomalyFinding::new(
                ctx.name(),
                AnomalyType::OutOfRange,
                format!(
                    "{flagged} {noun} ({pct:.2}%) fall outside the plausible range [{}, {}] \
                     ({low} below, {high} above)",
                    render(min),
                    render(max),
                ),
            )
            .with_evidence(
                FindingEvidence::new(flagged)
                    .with_percentage(pct)
                    .with_statistic(flagged as f64)
                    .with_tail(tail),
            ),
        )
    }
}

// =============================================================================
// DUPLICATE KEYS
// =============================================================================

/// Repeated values in a column expected to be unique.
pub struct DuplicateKeyRule {
    pub threshold: usize,
}

impl DetectionRule for DuplicateKeyRule {
    fn name(&self) -> &'static str {
        "duplicate_key"
    }

    fn anomaly_type(&self) -> AnomalyType {
        AnomalyType::DuplicateKey
    }

    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding> {
        if !ctx.score.is_some_and(|s| s.expected_unique) {
            return None;
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for v in ctx.dataset.cells(ctx.index).filter_map(|c| c.value()) {
            *counts.entry(v).or_insert(0) += 1;
        }

        let groups = counts.values().filter(|&&n| n > 1).count();
        if groups == 0 || groups < self.threshold {
            return None;
        }
        let rows: usize = counts.values().filter(|&&n| n > 1).sum();
        let pct = ctx.row_pct(rows);

        Some(
            AnomalyFinding::new(
                ctx.name(),
                AnomalyType::DuplicateKey,
                format!(
                    "{groups} duplicated value group(s) covering {rows} rows ({pct:.2}%) \
                     in a column expected to be unique"
                ),
            )
            .with_evidence(
                FindingEvidence::new(groups)
                    .with_percentage(pct)
                    .with_statistic(groups as f64)
                    .with_threshold(self.threshold as f64),
            ),
        )
    }
}

// =============================================================================
// CARDINALITY SHIFT
// =============================================================================

/// Distinct ratio moved beyond `delta` from the baseline run.
pub struct CardinalityShiftRule {
    pub delta: f64,
}

impl DetectionRule for CardinalityShiftRule {
    fn name(&self) -> &'static str {
        "cardinality_shift"
    }

    fn anomaly_type(&self) -> AnomalyType {
        AnomalyType::CardinalityShift
    }

    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding> {
        let baseline = ctx.baseline?;
        let current = ctx.profile.distinct_ratio()?;
        let previous = baseline.distinct_ratio()?;

        let shift = current - previous;
        if shift.abs() <= self.delta {
            return None;
        }
        let tail = if shift > 0.0 {
            TailDirection::High
        } else {
            TailDirection::Low
        };

        Some(
            AnomalyFinding::new(
                ctx.name(),
                AnomalyType::CardinalityShift,
                format!(
                    "distinct ratio {current:.3} vs baseline {previous:.3} \
                     (shift {:.3} exceeds {:.3}; {} distinct of {} rows, baseline {} of {})",
                    shift.abs(),
                    self.delta,
                    ctx.profile.distinct_count,
                    ctx.profile.total_count,
                    baseline.distinct_count,
                    baseline.total_count,
                ),
            )
            .with_evidence(
                FindingEvidence::new(ctx.profile.distinct_count)
                    .with_statistic(shift.abs())
                    .with_threshold(self.delta)
                    .with_tail(tail),
            ),
        )
    }
}

// =============================================================================
// MISSING VALUES
// =============================================================================

/// Completeness below the floor.
pub struct MissingValuesRule {
    pub floor: f64,
}

impl DetectionRule for MissingValuesRule {
    fn name(&self) -> &'static str {
        "missing_values"
    }

    fn anomaly_type(&self) -> AnomalyType {
        AnomalyType::MissingValues
    }

    fn detect(&self, ctx: &ColumnContext<'_>) -> Option<AnomalyFinding> {
        let score = ctx.score?;
        if score.no_data || score.completeness_pct >= self.floor {
            return None;
        }

        let p = ctx.profile;
        let missing = p.null_count + p.blank_count;

        Some(
            AnomalyFinding::new(
                ctx.name(),
                AnomalyType::MissingValues,
                format!(
                    "{missing} missing/blank of {} ({} null, {} blank); completeness {:.2}% is below {:.2}%",
                    p.total_count, p.null_count, p.blank_count, score.completeness_pct, self.floor,
                ),
            )
            .with_evidence(
                FindingEvidence::new(missing)
                    .with_percentage(ctx.row_pct(missing))
                    .with_statistic(score.completeness_pct)
                    .with_threshold(self.floor),
            ),
        )
    }
}

//! Anomaly detector configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CaliperError, Result};

/// How statistical outliers are scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlierMethod {
    /// Distance from the median in units of 1.4826·MAD.
    #[default]
    Robust,
    /// Distance from the mean in standard deviations.
    Classic,
}

/// Plausible range for amount columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmountBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Plausible range for date columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DateBounds {
    pub earliest: Option<NaiveDate>,
    pub latest: Option<NaiveDate>,
}

/// Switches for individual detection rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnabledRules {
    pub statistical_outlier: bool,
    pub pattern_violation: bool,
    pub out_of_range: bool,
    pub duplicate_key: bool,
    pub cardinality_shift: bool,
    pub missing_values: bool,
}

impl Default for EnabledRules {
    fn default() -> Self {
        Self {
            statistical_outlier: true,
            pattern_violation: true,
            out_of_range: true,
            duplicate_key: true,
            cardinality_shift: true,
            missing_values: true,
        }
    }
}

/// Configuration for anomaly detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// |z| above this is an outlier.
    pub z_score_threshold: f64,
    pub outlier_method: OutlierMethod,
    /// Tail quantile quoted in outlier findings.
    pub high_tail_percentile: f64,
    /// Minimum parsed values before outliers are looked for.
    pub min_numeric_values: usize,
    /// Validity percentage below which a pattern anomaly is reported.
    pub validity_floor: f64,
    /// Tukey fence multiplier for derived date/amount bounds.
    pub iqr_multiplier: f64,
    /// Explicit amount bounds; derived from the IQR when absent.
    pub amount_bounds: Option<AmountBounds>,
    /// Explicit date bounds; derived from the IQR when absent.
    pub date_bounds: Option<DateBounds>,
    pub allow_negative_amounts: bool,
    /// Duplicated value groups needed before a duplicate-key finding.
    pub duplicate_key_threshold: usize,
    /// Allowed change in distinct/total against the baseline.
    pub cardinality_delta: f64,
    /// Completeness percentage below which missing values are reported.
    pub completeness_floor: f64,
    pub rules: EnabledRules,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 3.0,
            outlier_method: OutlierMethod::Robust,
            high_tail_percentile: 99.9,
            min_numeric_values: 3,
            validity_floor: 95.0,
            iqr_multiplier: 3.0,
            amount_bounds: None,
            date_bounds: None,
            allow_negative_amounts: false,
            duplicate_key_threshold: 1,
            cardinality_delta: 0.10,
            completeness_floor: 95.0,
            rules: EnabledRules::default(),
        }
    }
}

impl AnomalyConfig {
    /// Reject values no detector can work with.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(CaliperError::Config(msg));

        if !(self.z_score_threshold.is_finite() && self.z_score_threshold > 0.0) {
            return fail(format!(
                "z_score_threshold must be positive, got {}",
                self.z_score_threshold
            ));
        }
        if !(self.high_tail_percentile > 50.0 && self.high_tail_percentile <= 100.0) {
            return fail(format!(
                "high_tail_percentile must be in (50, 100], got {}",
                self.high_tail_percentile
            ));
        }
        for (name, floor) in [
            ("validity_floor", self.validity_floor),
            ("completeness_floor", self.completeness_floor),
        ] {
            if !(0.0..=100.0).contains(&floor) {
                return fail(format!("{name} must be in [0, 100], got {floor}"));
            }
        }
        if !(self.iqr_multiplier.is_finite() && self.iqr_multiplier > 0.0) {
            return fail(format!(
                "iqr_multiplier must be positive, got {}",
                self.iqr_multiplier
            ));
        }
        if !(self.cardinality_delta >= 0.0 && self.cardinality_delta <= 1.0) {
            return fail(format!(
                "cardinality_delta must be in [0, 1], got {}",
                self.cardinality_delta
            ));
        }
        if self.duplicate_key_threshold == 0 {
            return fail("duplicate_key_threshold must be at least 1".to_string());
        }
        if let Some(AmountBounds {
            min: Some(min),
            max: Some(max),
        }) = &self.amount_bounds
        {
            if min > max {
                return fail(format!("amount_bounds are inverted: {min} > {max}"));
            }
        }
        if let Some(DateBounds {
            earliest: Some(earliest),
            latest: Some(latest),
        }) = &self.date_bounds
        {
            if earliest > latest {
                return fail(format!("date_bounds are inverted: {earliest} > {latest}"));
            }
        }
        Ok(())
    }
}

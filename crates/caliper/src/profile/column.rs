//! Column profile and its statistics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schema::InferredType;

/// Statistics for numeric, amount and date columns.
///
/// Date columns are measured in days since 1970-01-01.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    /// Values that parsed.
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Exact median.
    pub median: f64,
    /// Population standard deviation unless configured otherwise.
    pub std_dev: f64,
    /// First quartile (25th percentile).
    pub q1: f64,
    /// Third quartile (75th percentile).
    pub q3: f64,
}

impl NumericSummary {
    /// Calculate the interquartile range.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Calculate the z-score for a value.
    pub fn z_score(&self, value: f64) -> f64 {
        if self.std_dev == 0.0 {
            0.0
        } else {
            (value - self.mean) / self.std_dev
        }
    }
}

/// Calendar view of a date column's numeric summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
    pub median: NaiveDate,
}

/// Statistics for text columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthSummary {
    pub min_length: usize,
    pub max_length: usize,
    pub avg_length: f64,
}

/// Structural profile of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Column name.
    pub name: String,
    /// Type the column was profiled as.
    pub inferred_type: InferredType,
    /// Total number of cells.
    pub total_count: usize,
    /// Absent values.
    pub null_count: usize,
    /// Empty or whitespace-only values.
    pub blank_count: usize,
    /// Unique non-null, non-blank values (whitespace-trimmed).
    pub distinct_count: usize,
    /// Values excluded from numeric statistics because they did not parse.
    #[serde(default)]
    pub unparsed_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub numeric: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub date_range: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub text: Option<LengthSummary>,
}

impl ColumnProfile {
    /// Values that are not null (blanks included).
    pub fn non_null_count(&self) -> usize {
        self.total_count - self.null_count
    }

    /// Values that are neither null nor blank.
    pub fn populated_count(&self) -> usize {
        self.total_count - self.null_count - self.blank_count
    }

    /// False for a column profiled over zero rows.
    pub fn has_data(&self) -> bool {
        self.total_count > 0
    }

    /// Distinct values per row, the ratio compared across runs.
    pub fn distinct_ratio(&self) -> Option<f64> {
        self.has_data()
            .then(|| self.distinct_count as f64 / self.total_count as f64)
    }
}

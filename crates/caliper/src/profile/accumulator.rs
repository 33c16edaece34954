//! Single-pass accumulators for column statistics.
//!
//! Every accumulator can be updated one value at a time and merged with
//! another accumulator built over a disjoint shard of the same column, so a
//! large column can be profiled in parallel without being materialized twice.

use std::collections::HashSet;

use crate::input::Cell;
use crate::schema::InferredType;
use crate::values::{from_epoch_days, numeric_value};

use super::column::{ColumnProfile, DateRange, LengthSummary, NumericSummary};

// =============================================================================
// NUMERIC STATISTICS
// =============================================================================
// Welford's online algorithm for mean and variance, merged across shards with
// Chan's pairwise update. Order statistics are exact: values are buffered and
// sorted once when the accumulator is finished.

/// Streaming numeric statistics accumulator.
#[derive(Debug, Clone)]
pub struct NumericAccumulator {
    count: usize,
    mean: f64,
    m2: f64, // Sum of squared differences from mean
    min: f64,
    max: f64,
    values: Vec<f64>,
}

impl NumericAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            values: Vec::new(),
        }
    }

    /// Add a value using Welford's online algorithm.
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;

        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.values.push(value);
    }

    /// Fold another shard into this one.
    pub fn merge(&mut self, other: NumericAccumulator) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other;
            return;
        }

        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let n = n_a + n_b;
        let delta = other.mean - self.mean;

        self.mean += delta * n_b / n;
        self.m2 += other.m2 + delta * delta * n_a * n_b / n;
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.values.extend(other.values);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Variance: population by default, sample (n - 1) when requested.
    fn variance(&self, sample: bool) -> f64 {
        match (self.count, sample) {
            (0 | 1, _) => 0.0,
            (n, true) => self.m2 / (n - 1) as f64,
            (n, false) => self.m2 / n as f64,
        }
    }

    /// Convert to a summary; `None` when no value was seen.
    pub fn finish(mut self, sample_std_dev: bool) -> Option<NumericSummary> {
        if self.count == 0 {
            return None;
        }

        self.values.sort_by(f64::total_cmp);

        Some(NumericSummary {
            count: self.count,
            min: self.min,
            max: self.max,
            mean: self.mean,
            median: percentile(&self.values, 50.0),
            std_dev: self.variance(sample_std_dev).max(0.0).sqrt(),
            q1: percentile(&self.values, 25.0),
            q3: percentile(&self.values, 75.0),
        })
    }
}

impl Default for NumericAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Percentile of sorted values with linear interpolation between order
/// statistics. The 50th percentile of an even count is the mean of the two
/// middle values.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let pos = (p.clamp(0.0, 100.0) / 100.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

// =============================================================================
// TEXT LENGTHS
// =============================================================================

/// Character-length accumulator for text columns.
#[derive(Debug, Clone, Default)]
pub struct LengthAccumulator {
    count: usize,
    total_chars: usize,
    min: usize,
    max: usize,
}

impl LengthAccumulator {
    pub fn push(&mut self, len: usize) {
        self.min = if self.count == 0 { len } else { self.min.min(len) };
        self.max = self.max.max(len);
        self.total_chars += len;
        self.count += 1;
    }

    pub fn merge(&mut self, other: LengthAccumulator) {
        if other.count == 0 {
            return;
        }
        self.min = if self.count == 0 {
            other.min
        } else {
            self.min.min(other.min)
        };
        self.max = self.max.max(other.max);
        self.total_chars += other.total_chars;
        self.count += other.count;
    }

    pub fn finish(self) -> Option<LengthSummary> {
        (self.count > 0).then(|| LengthSummary {
            min_length: self.min,
            max_length: self.max,
            avg_length: self.total_chars as f64 / self.count as f64,
        })
    }
}

// =============================================================================
// COLUMN
// =============================================================================

/// Accumulates everything the profiler reports for one column.
#[derive(Debug, Clone)]
pub struct ColumnAccumulator<'a> {
    inferred_type: InferredType,
    total: usize,
    nulls: usize,
    blanks: usize,
    unparsed: usize,
    distinct: HashSet<&'a str>,
    numeric: NumericAccumulator,
    lengths: LengthAccumulator,
}

impl<'a> ColumnAccumulator<'a> {
    pub fn new(inferred_type: InferredType) -> Self {
        Self {
            inferred_type,
            total: 0,
            nulls: 0,
            blanks: 0,
            unparsed: 0,
            distinct: HashSet::new(),
            numeric: NumericAccumulator::new(),
            lengths: LengthAccumulator::default(),
        }
    }

    /// Add one raw cell.
    pub fn push(&mut self, raw: Option<&'a str>) {
        self.total += 1;

        let value = match Cell::classify(raw) {
            Cell::Null => {
                self.nulls += 1;
                return;
            }
            Cell::Blank => {
                self.blanks += 1;
                return;
            }
            Cell::Value(v) => v.trim(),
        };

        self.distinct.insert(value);

        if self.inferred_type.is_numeric() {
            match numeric_value(value, self.inferred_type) {
                Some(n) => self.numeric.push(n),
                None => self.unparsed += 1,
            }
        } else {
            self.lengths.push(value.chars().count());
        }
    }

    /// Fold another shard of the same column into this one.
    pub fn merge(&mut self, other: ColumnAccumulator<'a>) {
        self.total += other.total;
        self.nulls += other.nulls;
        self.blanks += other.blanks;
        self.unparsed += other.unparsed;
        self.distinct.extend(other.distinct);
        self.numeric.merge(other.numeric);
        self.lengths.merge(other.lengths);
    }

    /// Produce the immutable profile.
    pub fn finish(self, name: impl Into<String>, sample_std_dev: bool) -> ColumnProfile {
        let numeric = self.numeric.finish(sample_std_dev);

        let date_range = if self.inferred_type.is_temporal() {
            numeric.as_ref().and_then(|n| {
                Some(DateRange {
                    earliest: from_epoch_days(n.min)?,
                    latest: from_epoch_days(n.max)?,
                    median: from_epoch_days(n.median)?,
                })
            })
        } else {
            None
        };

        ColumnProfile {
            name: name.into(),
            inferred_type: self.inferred_type,
            total_count: self.total,
            null_count: self.nulls,
            blank_count: self.blanks,
            distinct_count: self.distinct.len(),
            unparsed_count: self.unparsed,
            numeric,
            date_range,
            text: self.lengths.finish(),
        }
    }
}

//! Per-column structural profiling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::Dataset;
use crate::parallel;
use crate::schema::{ColumnSchema, InferredType};

use super::accumulator::ColumnAccumulator;
use super::column::ColumnProfile;

/// Configuration for profiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Columns longer than this are accumulated in shards of this many rows
    /// and merged in shard order.
    pub shard_rows: usize,
    /// Use the sample (n - 1) standard deviation instead of the population one.
    pub sample_std_dev: bool,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            shard_rows: 65_536,
            sample_std_dev: false,
        }
    }
}

/// Computes a [`ColumnProfile`] per column.
pub struct ColumnProfiler {
    config: ProfileConfig,
}

impl ColumnProfiler {
    pub fn new() -> Self {
        Self::with_config(ProfileConfig::default())
    }

    pub fn with_config(config: ProfileConfig) -> Self {
        Self { config }
    }

    /// Profile every column, in dataset order.
    ///
    /// A column without a schema is profiled as text.
    pub fn profile(&self, dataset: &Dataset, schemas: &[ColumnSchema]) -> Vec<ColumnProfile> {
        parallel::map_columns(dataset.column_count(), |index| {
            let name = &dataset.columns()[index];
            let inferred_type = schemas
                .iter()
                .find(|s| &s.name == name)
                .map(|s| s.inferred_type)
                .unwrap_or_else(|| {
                    debug!(column = %name, "no schema supplied, profiling as text");
                    InferredType::Text
                });
            self.profile_named(dataset, index, name, inferred_type)
        })
    }

    /// Profile one column in a single pass (per shard).
    ///
    /// `None` when `index` is not a column of the dataset.
    pub fn profile_column(
        &self,
        dataset: &Dataset,
        index: usize,
        inferred_type: InferredType,
    ) -> Option<ColumnProfile> {
        let name = dataset.columns().get(index)?;
        Some(self.profile_named(dataset, index, name, inferred_type))
    }

    fn profile_named(
        &self,
        dataset: &Dataset,
        index: usize,
        name: &str,
        inferred_type: InferredType,
    ) -> ColumnProfile {
        let rows = dataset.row_count();
        let shard_rows = self.config.shard_rows.max(1);

        let accumulate = |start: usize, end: usize| {
            let mut acc = ColumnAccumulator::new(inferred_type);
            for raw in dataset.column_slice(index, start, end) {
                acc.push(raw);
            }
            acc
        };

        let acc = if rows <= shard_rows {
            accumulate(0, rows)
        } else {
            let starts: Vec<usize> = (0..rows).step_by(shard_rows).collect();
            debug!(column = name, shards = starts.len(), "profiling in shards");

            let shards: Vec<ColumnAccumulator<'_>> = starts
                .par_iter()
                .map(|&start| accumulate(start, start + shard_rows))
                .collect();

            let mut merged = ColumnAccumulator::new(inferred_type);
            for shard in shards {
                merged.merge(shard);
            }
            merged
        };

        acc.finish(name, self.config.sample_std_dev)
    }
}

impl Default for ColumnProfiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[Option<&str>]) -> Dataset {
        Dataset::new(
            vec!["c".to_string()],
            values.iter().map(|v| vec![v.map(String::from)]).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_profile_numeric_column() {
        let ds = column(&[Some("10"), Some("12"), Some("11"), Some("9"), Some("1000")]);
        let p = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Numeric).unwrap();
        let n = p.numeric.unwrap();

        assert_eq!(p.total_count, 5);
        assert_eq!((n.min, n.max, n.median), (9.0, 1000.0, 11.0));
        assert!((n.mean - 208.4).abs() < 1e-9);
    }

    #[test]
    fn test_profile_text_lengths() {
        let ds = column(&[Some("ab"), Some("abcd"), None, Some(" ")]);
        let p = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Text).unwrap();
        let t = p.text.unwrap();

        assert_eq!((t.min_length, t.max_length), (2, 4));
        assert_eq!(t.avg_length, 3.0);
        assert_eq!((p.null_count, p.blank_count, p.distinct_count), (1, 1, 2));
    }

    #[test]
    fn test_unparseable_values_do_not_poison_numeric_stats() {
        let ds = column(&[Some("1"), Some("oops"), Some("3")]);
        let p = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Numeric).unwrap();

        assert_eq!(p.unparsed_count, 1);
        assert_eq!(p.total_count, 3);
        assert_eq!(p.numeric.unwrap().median, 2.0);
    }

    #[test]
    fn test_constant_column_has_zero_std_dev() {
        let ds = column(&[Some("5"), Some("5"), Some("5")]);
        let p = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Numeric).unwrap();
        assert_eq!(p.numeric.unwrap().std_dev, 0.0);
    }

    #[test]
    fn test_date_column_reports_range() {
        let ds = column(&[Some("2024-01-01"), Some("2024-01-03"), Some("2024-01-31")]);
        let p = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Date).unwrap();
        let range = p.date_range.unwrap();

        assert_eq!(range.earliest.to_string(), "2024-01-01");
        assert_eq!(range.latest.to_string(), "2024-01-31");
        assert_eq!(range.median.to_string(), "2024-01-03");
    }

    #[test]
    fn test_empty_dataset() {
        let ds = column(&[]);
        let p = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Numeric).unwrap();

        assert_eq!(p.total_count, 0);
        assert_eq!(p.distinct_count, 0);
        assert!(p.numeric.is_none());
        assert!(!p.has_data());
        assert_eq!(p.distinct_ratio(), None);
    }

    #[test]
    fn test_sharded_profile_matches_single_pass() {
        let values: Vec<String> = (0..101).map(|i| ((i * 37) % 50).to_string()).collect();
        let mut cells: Vec<Option<&str>> = values.iter().map(|v| Some(v.as_str())).collect();
        cells[7] = None;
        let ds = column(&cells);

        let single = ColumnProfiler::new().profile_column(&ds, 0, InferredType::Numeric).unwrap();
        let sharded = ColumnProfiler::with_config(ProfileConfig {
            shard_rows: 10,
            ..ProfileConfig::default()
        })
        .profile_column(&ds, 0, InferredType::Numeric)
        .unwrap();

        assert_eq!(single.null_count, sharded.null_count);
        assert_eq!(single.distinct_count, sharded.distinct_count);
        let (a, b) = (single.numeric.unwrap(), sharded.numeric.unwrap());
        assert_eq!(a.median, b.median);
        assert_eq!((a.min, a.max), (b.min, b.max));
        assert!((a.std_dev - b.std_dev).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_column_index() {
        let ds = column(&[Some("1")]);
        assert!(ColumnProfiler::new().profile_column(&ds, 1, InferredType::Numeric).is_none());
    }

    #[test]
    fn test_missing_schema_profiles_as_text() {
        let ds = column(&[Some("1")]);
        let profiles = ColumnProfiler::new().profile(&ds, &[]);
        assert_eq!(profiles[0].inferred_type, InferredType::Text);
    }
}

//! Semantic type inference from sampled column values.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::Dataset;
use crate::parallel;
use crate::schema::{ColumnSchema, InferredType, name_tokens};
use crate::values::conforms;

/// Configuration for schema inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Non-null, non-blank values sampled per column.
    pub sample_size: usize,
    /// A type is accepted when strictly more than this fraction of sampled
    /// values match it (or when every sampled value does).
    pub min_match_fraction: f64,
    /// Let column-name cues (zip, phone, amount, date) take precedence over
    /// plain numeric when the values also support the hinted type.
    pub use_name_hints: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 1000,
            min_match_fraction: 0.5,
            use_name_hints: false,
        }
    }
}

/// Infers a [`ColumnSchema`] per column.
pub struct SchemaInferencer {
    config: InferenceConfig,
}

impl SchemaInferencer {
    /// Create an inferencer with default settings.
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    pub fn with_config(config: InferenceConfig) -> Self {
        Self { config }
    }

    /// Infer schemas for every column, in dataset order.
    pub fn infer(&self, sample: &Dataset) -> Vec<ColumnSchema> {
        parallel::map_columns(sample.column_count(), |index| {
            self.infer_named(sample, index, &sample.columns()[index])
        })
    }

    /// Infer the schema of one column. A column without a confident type
    /// becomes text; `None` only when `index` is not a column of the sample.
    pub fn infer_column(&self, sample: &Dataset, index: usize) -> Option<ColumnSchema> {
        let name = sample.columns().get(index)?;
        Some(self.infer_named(sample, index, name))
    }

    fn infer_named(&self, sample: &Dataset, index: usize, name: &str) -> ColumnSchema {
        let values: Vec<&str> = sample
            .cells(index)
            .filter_map(|c| c.value())
            .take(self.config.sample_size)
            .collect();

        if values.is_empty() {
            debug!(column = name, "no sampled values, defaulting to text");
            return ColumnSchema::fallback(name, index);
        }

        let total = values.len() as f64;
        let fractions: Vec<(InferredType, f64)> = InferredType::PRIORITY
            .iter()
            .map(|&t| {
                let matched = values.iter().filter(|v| conforms(v, t)).count();
                (t, matched as f64 / total)
            })
            .collect();

        let schema = |t: InferredType, confidence: f64| {
            ColumnSchema::new(name, index, t, confidence).with_sampled(values.len())
        };

        if self.config.use_name_hints {
            if let Some(hinted) = name_hint(name) {
                if let Some(&(_, fraction)) = fractions.iter().find(|(t, _)| *t == hinted) {
                    if self.qualifies(fraction) {
                        return schema(hinted, fraction);
                    }
                }
            }
        }

        if let Some(&(t, fraction)) = fractions.iter().find(|(_, f)| self.qualifies(*f)) {
            return schema(t, fraction);
        }

        let best = fractions.iter().map(|(_, f)| *f).fold(0.0, f64::max);
        if best == 0.0 {
            schema(InferredType::Text, 1.0)
        } else {
            debug!(column = name, best_fraction = best, "ambiguous column, defaulting to text");
            schema(InferredType::Text, 0.0)
        }
    }

    fn qualifies(&self, fraction: f64) -> bool {
        fraction > 0.0 && (fraction > self.config.min_match_fraction || fraction >= 1.0)
    }
}

impl Default for SchemaInferencer {
    fn default() -> Self {
        Self::new()
    }
}

/// Type suggested by the column name, if any.
fn name_hint(name: &str) -> Option<InferredType> {
    let tokens = name_tokens(name);
    let has = |words: &[&str]| tokens.iter().any(|t| words.contains(&t.as_str()));

    if has(&["zip", "zipcode", "postal", "postcode"]) {
        Some(InferredType::ZipLike)
    } else if has(&["phone", "tel", "telephone", "mobile", "fax"]) {
        Some(InferredType::PhoneLike)
    } else if has(&["amount", "price", "cost", "total", "balance", "salary", "fee"]) {
        Some(InferredType::AmountLike)
    } else if has(&["date", "dob"]) {
        Some(InferredType::Date)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[Option<&str>]) -> Dataset {
        Dataset::new(
            vec![name.to_string()],
            values.iter().map(|v| vec![v.map(String::from)]).collect(),
        )
        .unwrap()
    }

    fn infer(ds: &Dataset) -> ColumnSchema {
        SchemaInferencer::new().infer_column(ds, 0).unwrap()
    }

    #[test]
    fn test_infer_numeric() {
        let schema = infer(&column("n", &[Some("1"), Some("2.5"), Some("-3"), None]));
        assert_eq!(schema.inferred_type, InferredType::Numeric);
        assert_eq!(schema.confidence, 1.0);
        assert_eq!(schema.sampled, 3);
    }

    #[test]
    fn test_infer_date_email_phone() {
        let dates = column("d", &[Some("2024-01-15"), Some("2024-02-20")]);
        assert_eq!(infer(&dates).inferred_type, InferredType::Date);

        let emails = column("e", &[Some("a@x.com"), Some("bad"), Some("c@y.com")]);
        let schema = infer(&emails);
        assert_eq!(schema.inferred_type, InferredType::EmailLike);
        assert!((schema.confidence - 2.0 / 3.0).abs() < 1e-9);

        let phones = column("p", &[Some("(555) 123-4567"), Some("1-555-987-6543")]);
        assert_eq!(infer(&phones).inferred_type, InferredType::PhoneLike);
    }

    #[test]
    fn test_infer_zip_with_leading_zeros() {
        // 02134 also parses as a number, so numeric wins by priority
        let plain = column("z", &[Some("02134"), Some("10001")]);
        assert_eq!(infer(&plain).inferred_type, InferredType::Numeric);

        let plus_four = column("z", &[Some("02134-1234"), Some("10001-0001")]);
        assert_eq!(infer(&plus_four).inferred_type, InferredType::ZipLike);
    }

    #[test]
    fn test_infer_amount() {
        let ds = column("a", &[Some("$1,200.00"), Some("$35.10"), Some("1,000")]);
        assert_eq!(infer(&ds).inferred_type, InferredType::AmountLike);
    }

    #[test]
    fn test_plain_text_has_full_confidence() {
        let schema = infer(&column("name", &[Some("Alice"), Some("Bob")]));
        assert_eq!(schema.inferred_type, InferredType::Text);
        assert_eq!(schema.confidence, 1.0);
    }

    #[test]
    fn test_ambiguous_column_falls_back_to_text() {
        let ds = column(
            "mixed",
            &[Some("1"), Some("2"), Some("a@x.com"), Some("b@y.com")],
        );
        let schema = infer(&ds);
        assert_eq!(schema.inferred_type, InferredType::Text);
        assert_eq!(schema.confidence, 0.0);
    }

    #[test]
    fn test_empty_column_falls_back_to_text() {
        let schema = infer(&column("e", &[None, Some("  ")]));
        assert_eq!(schema.inferred_type, InferredType::Text);
        assert_eq!(schema.confidence, 0.0);
        assert_eq!(schema.sampled, 0);
    }

    #[test]
    fn test_name_hints_override_numeric() {
        let ds = column("zip_code", &[Some("02134"), Some("10001")]);
        let inferencer = SchemaInferencer::with_config(InferenceConfig {
            use_name_hints: true,
            ..InferenceConfig::default()
        });
        assert_eq!(inferencer.infer_column(&ds, 0).unwrap().inferred_type, InferredType::ZipLike);

        // Hint ignored when values do not support it
        let ds = column("zip_code", &[Some("abc"), Some("def")]);
        assert_eq!(inferencer.infer_column(&ds, 0).unwrap().inferred_type, InferredType::Text);
    }

    #[test]
    fn test_sample_size_bounds_inspection() {
        let mut values: Vec<Option<&str>> = vec![Some("1"); 5];
        values.extend(vec![Some("x"); 20]);
        let inferencer = SchemaInferencer::with_config(InferenceConfig {
            sample_size: 5,
            ..InferenceConfig::default()
        });
        let schema = inferencer.infer_column(&column("n", &values), 0).unwrap();
        assert_eq!(schema.inferred_type, InferredType::Numeric);
        assert_eq!(schema.sampled, 5);
    }

    #[test]
    fn test_out_of_range_column_index() {
        let ds = column("n", &[Some("1")]);
        assert!(SchemaInferencer::new().infer_column(&ds, 3).is_none());
    }

    #[test]
    fn test_infer_keeps_column_order() {
        let ds = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![vec![Some("1".into()), Some("x".into())]],
        )
        .unwrap();
        let schemas = SchemaInferencer::new().infer(&ds);
        assert_eq!(schemas[0].name, "a");
        assert_eq!(schemas[1].position, 1);
    }
}

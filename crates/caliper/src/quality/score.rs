//! Quality score types.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::rules::RuleSource;

/// Quality score of one column. Percentages lie in [0, 100]; `None` means
/// not applicable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQualityScore {
    pub name: String,
    pub completeness_pct: f64,
    /// Only computed for columns expected to be unique.
    pub uniqueness_pct: Option<f64>,
    pub validity_pct: Option<f64>,
    /// Non-null values that failed the validity rule.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub invalid_count: Option<usize>,
    pub overall_score: f64,
    pub expected_unique: bool,
    /// The column was scored over zero rows.
    pub no_data: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub rule: Option<RuleSource>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

/// Columns the caller expects to hold unique values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqueHints(IndexSet<String>);

impl UniqueHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>) -> bool {
        self.0.insert(column.into())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for UniqueHints {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

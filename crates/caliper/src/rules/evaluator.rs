//! Validity scoring against assigned or default-per-type patterns.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::input::{Cell, Dataset};
use crate::parallel;
use crate::profile::ColumnProfile;
use crate::schema::InferredType;
use crate::values::{conforms, percentage};

use super::patterns::default_rule;
use super::rule_set::QualityRules;

/// Which rule a column's validity was measured against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleSource {
    /// Pattern supplied by the caller for this column.
    Assigned { pattern: String },
    /// Canonical pattern for the column's inferred type.
    Default {
        inferred_type: InferredType,
        pattern: String,
    },
    /// Text column: a value is valid when it is not blank.
    NonEmpty,
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Assigned { pattern } => write!(f, "assigned pattern `{pattern}`"),
            RuleSource::Default {
                inferred_type,
                pattern,
            } => write!(f, "default {inferred_type} pattern `{pattern}`"),
            RuleSource::NonEmpty => write!(f, "non-empty check"),
        }
    }
}

/// Outcome class of a validity evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidityStatus {
    /// A percentage was computed.
    Scored,
    /// Nothing to check (no non-null values).
    NotApplicable,
    /// The assigned pattern failed to compile.
    RuleError,
}

/// Validity of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidityResult {
    pub name: String,
    pub rule: Option<RuleSource>,
    /// Non-null values checked.
    pub checked: usize,
    /// Values that satisfied the rule.
    pub matched: usize,
    /// `None` unless status is `Scored`.
    pub validity_pct: Option<f64>,
    pub status: ValidityStatus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

impl ValidityResult {
    fn not_applicable(name: &str, rule: Option<RuleSource>) -> Self {
        Self {
            name: name.to_string(),
            rule,
            checked: 0,
            matched: 0,
            validity_pct: None,
            status: ValidityStatus::NotApplicable,
            warning: None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.status == ValidityStatus::Scored
    }
}

/// A rule ready to run against one column.
enum Check<'r> {
    Assigned(&'r Regex),
    Typed(InferredType),
    NonEmpty,
}

impl Check<'_> {
    fn accepts(&self, value: &str) -> bool {
        match self {
            Check::Assigned(re) => re.is_match(value),
            Check::Typed(t) => conforms(value, *t),
            Check::NonEmpty => !value.is_empty(),
        }
    }
}

/// Evaluates validity for every profiled column.
///
/// Assigned patterns are anchored at the start of the trimmed value, so
/// `\d{3}` accepts `123abc` but not `ab123`. Add `$` for a full match.
#[derive(Debug, Default)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// One result per profile, in profile order.
    pub fn evaluate(
        &self,
        dataset: &Dataset,
        profiles: &[ColumnProfile],
        rules: &QualityRules,
    ) -> Vec<ValidityResult> {
        for (field, _) in rules.iter() {
            if dataset.column_index(field).is_none() {
                warn!(field, "quality rule names a column that is not in the dataset");
            }
        }

        let compiled: IndexMap<&str, Result<Regex, String>> = rules
            .iter()
            .map(|(field, pattern)| {
                let compiled = Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
                    warn!(field, pattern, error = %e, "invalid quality rule pattern");
                    format!("invalid pattern `{pattern}` for '{field}': {e}")
                });
                (field, compiled)
            })
            .collect();

        parallel::map_columns(profiles.len(), |i| {
            self.evaluate_column(dataset, &profiles[i], rules, &compiled)
        })
    }

    fn evaluate_column(
        &self,
        dataset: &Dataset,
        profile: &ColumnProfile,
        rules: &QualityRules,
        compiled: &IndexMap<&str, Result<Regex, String>>,
    ) -> ValidityResult {
        let name = profile.name.as_str();

        let (check, rule) = match (rules.get(name), compiled.get(name)) {
            (Some(pattern), Some(Ok(re))) => (
                Check::Assigned(re),
                RuleSource::Assigned {
                    pattern: pattern.to_string(),
                },
            ),
            (Some(pattern), Some(Err(message))) => {
                return ValidityResult {
                    warning: Some(message.clone()),
                    status: ValidityStatus::RuleError,
                    ..ValidityResult::not_applicable(
                        name,
                        Some(RuleSource::Assigned {
                            pattern: pattern.to_string(),
                        }),
                    )
                };
            }
            _ => match default_rule(profile.inferred_type) {
                Some(default) => (
                    Check::Typed(profile.inferred_type),
                    RuleSource::Default {
                        inferred_type: profile.inferred_type,
                        pattern: default.pattern.to_string(),
                    },
                ),
                None => (Check::NonEmpty, RuleSource::NonEmpty),
            },
        };

        let checked = profile.non_null_count();
        let Some(index) = dataset.column_index(name) else {
            debug!(column = name, "profiled column missing from dataset");
            return ValidityResult::not_applicable(name, Some(rule));
        };
        if checked == 0 {
            return ValidityResult::not_applicable(name, Some(rule));
        }

        // Blank cells are non-null and fail every rule.
        let matched = dataset
            .cells(index)
            .filter(|cell| match cell {
                Cell::Value(_) => cell.value().is_some_and(|v| check.accepts(v)),
                _ => false,
            })
            .count();

        ValidityResult {
            name: name.to_string(),
            rule: Some(rule),
            checked,
            matched,
            validity_pct: percentage(matched, checked),
            status: ValidityStatus::Scored,
            warning: None,
        }
    }
}

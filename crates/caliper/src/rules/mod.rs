//! Validity rules: assigned patterns, per-type defaults and their evaluation.

mod evaluator;
mod patterns;
mod rule_set;

pub use evaluator::{RuleEvaluator, RuleSource, ValidityResult, ValidityStatus};
pub use patterns::{DefaultRule, default_rule, matches_default};
pub use rule_set::QualityRules;

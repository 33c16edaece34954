//! Default validity patterns keyed by inferred type.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::InferredType;

/// A canonical pattern applied when a column has no assigned rule.
#[derive(Debug)]
pub struct DefaultRule {
    pub inferred_type: InferredType,
    pub pattern: &'static str,
    pub regex: Regex,
}

const NUMERIC: &str = r"^[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?$";
const DATE: &str = r"^\d{4}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])$";
const EMAIL: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
const PHONE: &str = r"^(?:\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}$";
const ZIP: &str = r"^\d{5}(?:-\d{4})?$";
const AMOUNT: &str = r"^[-+]?[$€£¥]?\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?$";

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Compiled once on first use. Text has no entry.

static DEFAULT_RULES: Lazy<Vec<DefaultRule>> = Lazy::new(|| {
    [
        (InferredType::Numeric, NUMERIC),
        (InferredType::Date, DATE),
        (InferredType::EmailLike, EMAIL),
        (InferredType::PhoneLike, PHONE),
        (InferredType::ZipLike, ZIP),
        (InferredType::AmountLike, AMOUNT),
    ]
    .into_iter()
    .map(|(inferred_type, pattern)| DefaultRule {
        inferred_type,
        pattern,
        regex: Regex::new(pattern).unwrap(),
    })
    .collect()
});

/// Look up the default rule for a type.
pub fn default_rule(inferred_type: InferredType) -> Option<&'static DefaultRule> {
    DEFAULT_RULES
        .iter()
        .find(|rule| rule.inferred_type == inferred_type)
}

/// Check a trimmed value against the default pattern for a type.
///
/// Text has no default pattern and always returns false.
pub fn matches_default(inferred_type: InferredType, value: &str) -> bool {
    default_rule(inferred_type).is_some_and(|rule| rule.regex.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_specialised_type_has_a_rule() {
        for t in InferredType::PRIORITY {
            assert!(default_rule(t).is_some(), "{t} has no default rule");
        }
        assert!(default_rule(InferredType::Text).is_none());
    }

    #[test]
    fn test_email_pattern() {
        assert!(matches_default(InferredType::EmailLike, "a@x.com"));
        assert!(!matches_default(InferredType::EmailLike, "bad"));
        assert!(!matches_default(InferredType::EmailLike, "a b@x.com"));
    }

    #[test]
    fn test_phone_pattern() {
        for ok in ["1-555-123-4567", "(555) 123-4567", "5551234567", "+1 555.123.4567"] {
            assert!(matches_default(InferredType::PhoneLike, ok), "{ok}");
        }
        assert!(!matches_default(InferredType::PhoneLike, "555-1234"));
    }

    #[test]
    fn test_zip_and_amount_patterns() {
        assert!(matches_default(InferredType::ZipLike, "02134"));
        assert!(matches_default(InferredType::ZipLike, "02134-1234"));
        assert!(!matches_default(InferredType::ZipLike, "2134"));

        assert!(matches_default(InferredType::AmountLike, "$1,234.56"));
        assert!(matches_default(InferredType::AmountLike, "-$5.00"));
        assert!(matches_default(InferredType::AmountLike, "1000"));
        assert!(!matches_default(InferredType::AmountLike, "12.345"));
    }

    #[test]
    fn test_date_pattern() {
        assert!(matches_default(InferredType::Date, "2024-01-15"));
        assert!(!matches_default(InferredType::Date, "2024-13-01"));
        assert!(!matches_default(InferredType::Date, "01/15/2024"));
    }
}

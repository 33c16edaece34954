//! Parsing of raw cell text into numbers and dates.

use chrono::{Duration, NaiveDate};

use crate::rules::matches_default;
use crate::schema::InferredType;

/// Parse a plain finite number.
pub fn parse_numeric(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Parse a finite monetary amount, ignoring currency symbols and thousands
/// separators.
pub fn parse_amount(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if !matches_default(InferredType::AmountLike, trimmed) {
        return None;
    }

    let digits: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let magnitude = digits.parse::<f64>().ok().filter(|n| n.is_finite())?;

    Some(if trimmed.starts_with('-') {
        -magnitude
    } else {
        magnitude
    })
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if !matches_default(InferredType::Date, trimmed) {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

/// Days since 1970-01-01.
pub fn to_epoch_days(date: NaiveDate) -> f64 {
    (date - NaiveDate::default()).num_days() as f64
}

/// Inverse of [`to_epoch_days`], rounding to the nearest day.
pub fn from_epoch_days(days: f64) -> Option<NaiveDate> {
    if !days.is_finite() {
        return None;
    }
    NaiveDate::default().checked_add_signed(Duration::try_days(days.round() as i64)?)
}

/// The numeric reading of a value for a column of the given type.
///
/// Returns `None` for types that are not profiled numerically and for values
/// that do not parse.
pub fn numeric_value(value: &str, inferred_type: InferredType) -> Option<f64> {
    match inferred_type {
        InferredType::Numeric => parse_numeric(value),
        InferredType::AmountLike => parse_amount(value).or_else(|| parse_numeric(value)),
        InferredType::Date => parse_date(value).map(to_epoch_days),
        _ => None,
    }
}

/// Whether a trimmed value is a well-formed instance of a specialised type.
///
/// Numbers and dates must actually parse; the other types are checked against
/// their default pattern. Text never conforms.
pub fn conforms(value: &str, inferred_type: InferredType) -> bool {
    match inferred_type {
        InferredType::Numeric => parse_numeric(value).is_some(),
        InferredType::Date => parse_date(value).is_some(),
        other => matches_default(other, value),
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / whole` as a percentage in [0, 100], rounded to two decimals.
///
/// `None` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| round2((part as f64 / whole as f64 * 100.0).clamp(0.0, 100.0)))
}

//! Fuzz target for the cell value parsers.

#![no_main]

use caliper::values::{conforms, parse_amount, parse_date, parse_numeric};
use caliper::InferredType;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Some(n) = parse_numeric(data) {
        assert!(n.is_finite());
    }
    let _ = parse_amount(data);
    let _ = parse_date(data);

    for t in [
        InferredType::Numeric,
        InferredType::Date,
        InferredType::EmailLike,
        InferredType::PhoneLike,
        InferredType::ZipLike,
        InferredType::AmountLike,
        InferredType::Text,
    ] {
        let _ = conforms(data, t);
    }
});

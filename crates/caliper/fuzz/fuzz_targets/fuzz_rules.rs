//! Fuzz target for user-supplied rule patterns.
//!
//! Any pattern, valid or not, must leave the report intact: invalid ones
//! degrade the column to a rule error instead of failing the run.

#![no_main]

use arbitrary::Arbitrary;
use caliper::{Caliper, Dataset, QualityRules};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    pattern: String,
    values: Vec<Option<String>>,
}

fuzz_target!(|input: Input| {
    if input.pattern.len() > 256 || input.values.len() > 1_000 {
        return;
    }

    let rows = input.values.into_iter().map(|v| vec![v]).collect();
    let Ok(dataset) = Dataset::new(vec!["field".to_string()], rows) else {
        return;
    };
    let rules = QualityRules::new().with_rule("field", input.pattern);

    let report = Caliper::new()
        .analyze("fuzz", &dataset, &rules)
        .expect("single-column analysis cannot violate the report contract");
    assert_eq!(report.columns.len(), 1);
});

//! Fuzz target for the delimited parser and the pipeline behind it.
//!
//! Checks that malformed input never panics, for every supported delimiter,
//! and that anything the parser accepts can be analyzed.

#![no_main]

use caliper::{Caliper, Parser, QualityRules};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    for delimiter in [b',', b'\t', b';', b'|'] {
        if let Ok(dataset) = parser.parse_bytes(data, delimiter) {
            let _ = Caliper::new().analyze("fuzz", &dataset, &QualityRules::new());
        }
    }
});

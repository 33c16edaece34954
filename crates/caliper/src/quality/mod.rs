//! Aggregate quality scoring: completeness, uniqueness and validity.

mod score;
mod scorer;

pub use score::{ColumnQualityScore, UniqueHints};
pub use scorer::{QualityScorer, ScoringConfig};

//! Column profiling: counts, numeric statistics and text lengths.

mod accumulator;
mod column;
mod profiler;

pub use accumulator::{ColumnAccumulator, LengthAccumulator, NumericAccumulator, percentile};
pub use column::{ColumnProfile, DateRange, LengthSummary, NumericSummary};
pub use profiler::{ColumnProfiler, ProfileConfig};

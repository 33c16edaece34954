//! Report assembly and export.

mod assembler;
pub mod export;
mod types;

pub use assembler::ReportAssembler;
pub use export::write_delimited;
pub use types::{Report, ReportColumn, ReportSummary};

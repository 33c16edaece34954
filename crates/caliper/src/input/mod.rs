//! Input parsing and dataset handling.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{Cell, Dataset, SourceMetadata};

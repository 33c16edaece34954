//! Schema types for representing inferred column types.

mod column;
mod naming;
mod types;

pub use column::ColumnSchema;
pub use naming::name_tokens;
pub use types::InferredType;

//! Column schema definition.

use serde::{Deserialize, Serialize};

use super::types::InferredType;

/// Inferred schema for a single column. Created once per run and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Zero-based position in the dataset.
    pub position: usize,
    /// Inferred semantic type.
    pub inferred_type: InferredType,
    /// Fraction of sampled values supporting the type (0.0-1.0).
    pub confidence: f64,
    /// Number of non-null, non-blank values inspected.
    pub sampled: usize,
}

impl ColumnSchema {
    /// Create a new column schema.
    pub fn new(
        name: impl Into<String>,
        position: usize,
        inferred_type: InferredType,
        confidence: f64,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            inferred_type,
            confidence,
            sampled: 0,
        }
    }

    /// Fallback schema for a column nothing could be inferred about.
    pub fn fallback(name: impl Into<String>, position: usize) -> Self {
        Self::new(name, position, InferredType::Text, 0.0)
    }

    /// Set the sample size.
    pub fn with_sampled(mut self, sampled: usize) -> Self {
        self.sampled = sampled;
        self
    }
}

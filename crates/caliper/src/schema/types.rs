//! Core type definitions for schema representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type inferred for a column.
///
/// The declaration order is the inference priority: when several types
/// qualify, the earlier one wins.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    /// Plain numbers (integers, decimals, scientific notation).
    Numeric,
    /// ISO calendar dates (`YYYY-MM-DD`).
    Date,
    /// Email addresses.
    EmailLike,
    /// North American style phone numbers.
    PhoneLike,
    /// US ZIP codes (5 or 5+4 digits).
    ZipLike,
    /// Monetary amounts with currency symbols or thousands separators.
    AmountLike,
    /// Anything else.
    #[default]
    Text,
}

impl InferredType {
    /// Specialised types in inference priority order (text excluded).
    pub const PRIORITY: [InferredType; 6] = [
        InferredType::Numeric,
        InferredType::Date,
        InferredType::EmailLike,
        InferredType::PhoneLike,
        InferredType::ZipLike,
        InferredType::AmountLike,
    ];

    /// Returns true if values of this type are profiled as numbers.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            InferredType::Numeric | InferredType::AmountLike | InferredType::Date
        )
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, InferredType::Date)
    }

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            InferredType::Numeric => "numeric",
            InferredType::Date => "date",
            InferredType::EmailLike => "email",
            InferredType::PhoneLike => "phone",
            InferredType::ZipLike => "zip",
            InferredType::AmountLike => "amount",
            InferredType::Text => "text",
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//! Session-scoped field → pattern mapping.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CaliperError, Result};

/// User-assigned validity patterns, keyed by column name.
///
/// Patterns are kept as source text; they are compiled (and rejected, per
/// column) by the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityRules {
    rules: IndexMap<String, String>,
}

impl QualityRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a pattern to a field, replacing any previous one.
    pub fn insert(&mut self, field: impl Into<String>, pattern: impl Into<String>) {
        self.rules.insert(field.into(), pattern.into());
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_rule(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.insert(field, pattern);
        self
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.rules.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a JSON object of `"field": "pattern"` pairs, keeping the order
    /// the fields appear in.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let map: IndexMap<String, Value> = match serde_json::from_str(json) {
            Ok(map) => map,
            Err(e) if e.is_data() => {
                return Err(CaliperError::Config(
                    "quality rules must be a JSON object of field -> pattern".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        let mut rules = IndexMap::with_capacity(map.len());
        for (field, pattern) in map {
            match pattern {
                Value::String(p) => {
                    rules.insert(field, p);
                }
                other => {
                    return Err(CaliperError::Config(format!(
                        "pattern for '{field}' must be a string, got {other}"
                    )));
                }
            }
        }
        Ok(Self { rules })
    }

    /// Load rules from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CaliperError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QualityRules {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

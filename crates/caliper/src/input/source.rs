//! Dataset representation and source metadata.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CaliperError, Result};

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Detected encoding.
    pub encoding: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            encoding: "utf-8".to_string(),
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }

    /// File name without its extension, used as the default dataset name.
    pub fn dataset_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.file.clone())
    }
}

/// Classification of a raw cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell<'a> {
    /// Value absent.
    Null,
    /// Empty or whitespace-only text.
    Blank,
    /// A value with at least one non-whitespace character.
    Value(&'a str),
}

impl<'a> Cell<'a> {
    /// Classify a raw cell.
    pub fn classify(raw: Option<&'a str>) -> Self {
        match raw {
            None => Cell::Null,
            Some(s) if s.trim().is_empty() => Cell::Blank,
            Some(s) => Cell::Value(s),
        }
    }

    /// The trimmed value, if any.
    pub fn value(&self) -> Option<&'a str> {
        match self {
            Cell::Value(s) => Some(s.trim()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

/// Tabular data handed to the pipeline.
///
/// Column names are unique; every row holds exactly one cell per column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Dataset {
    /// Create a dataset from positional rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        check_unique(&columns)?;

        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != columns.len())
            .map(|(i, r)| (i, r.len()))
        {
            return Err(CaliperError::RowWidth {
                row,
                expected: columns.len(),
                found,
            });
        }

        Ok(Self { columns, rows })
    }

    /// Create a dataset from name-keyed records. Keys absent from a record
    /// become null cells; keys that are not columns are ignored.
    pub fn from_records(
        columns: Vec<String>,
        records: Vec<HashMap<String, Option<String>>>,
    ) -> Result<Self> {
        check_unique(&columns)?;

        let rows = records
            .into_iter()
            .map(|mut record| {
                columns
                    .iter()
                    .map(|c| record.remove(c).flatten())
                    .collect()
            })
            .collect();

        Ok(Self { columns, rows })
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Raw cells of a column, in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Raw cells of a column for a row range.
    pub fn column_slice(
        &self,
        index: usize,
        start: usize,
        end: usize,
    ) -> impl Iterator<Item = Option<&str>> {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        self.rows[start..end]
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Classified cells of a column, in row order.
    pub fn cells(&self, index: usize) -> impl Iterator<Item = Cell<'_>> {
        self.column_values(index).map(Cell::classify)
    }

    /// A specific cell.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).and_then(|c| c.as_deref())
    }

    /// The first `n` rows as a new dataset.
    pub fn head(&self, n: usize) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }
}

fn check_unique(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for c in columns {
        if !seen.insert(c.as_str()) {
            return Err(CaliperError::DuplicateColumn(c.clone()));
        }
    }
    Ok(())
}

//! The assembled quality report.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::anomaly::{AnomalyFinding, AnomalyType};
use crate::error::{CaliperError, Result};
use crate::profile::ColumnProfile;
use crate::quality::ColumnQualityScore;
use crate::schema::ColumnSchema;
use crate::values::round2;

/// Schema, profile and score of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportColumn {
    pub name: String,
    pub schema: ColumnSchema,
    pub profile: ColumnProfile,
    pub score: ColumnQualityScore,
}

/// Quality report for one dataset. Columns keep the dataset's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub dataset_name: String,
    pub generated_at: DateTime<Utc>,
    pub row_count: usize,
    pub columns: Vec<ReportColumn>,
    pub anomalies: Vec<AnomalyFinding>,
}

/// Derived overview of a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub dataset_name: String,
    pub column_count: usize,
    pub row_count: usize,
    /// Mean overall score over columns with data.
    pub mean_overall_score: Option<f64>,
    pub anomaly_count: usize,
    pub anomalies_by_type: IndexMap<AnomalyType, usize>,
    pub columns_with_warnings: usize,
    pub no_data: bool,
}

impl Report {
    pub fn column(&self, name: &str) -> Option<&ReportColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column profiles in order, e.g. as the baseline for a later run.
    pub fn profiles(&self) -> Vec<ColumnProfile> {
        self.columns.iter().map(|c| c.profile.clone()).collect()
    }

    pub fn anomalies_for(&self, field: &str) -> impl Iterator<Item = &AnomalyFinding> {
        self.anomalies.iter().filter(move |a| a.field == field)
    }

    pub fn summary(&self) -> ReportSummary {
        let scored: Vec<f64> = self
            .columns
            .iter()
            .filter(|c| !c.score.no_data)
            .map(|c| c.score.overall_score)
            .collect();
        let mean_overall_score =
            (!scored.is_empty()).then(|| round2(scored.iter().sum::<f64>() / scored.len() as f64));

        let mut anomalies_by_type = IndexMap::new();
        for t in AnomalyType::ALL {
            let n = self.anomalies.iter().filter(|a| a.anomaly_type == t).count();
            if n > 0 {
                anomalies_by_type.insert(t, n);
            }
        }

        ReportSummary {
            dataset_name: self.dataset_name.clone(),
            column_count: self.columns.len(),
            row_count: self.row_count,
            mean_overall_score,
            anomaly_count: self.anomalies.len(),
            anomalies_by_type,
            columns_with_warnings: self
                .columns
                .iter()
                .filter(|c| !c.score.warnings.is_empty())
                .count(),
            no_data: self.row_count == 0,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a report written by [`to_json`](Self::to_json).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CaliperError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }
}

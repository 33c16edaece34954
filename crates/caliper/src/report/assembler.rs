//! Merges per-column results into a [`Report`].

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::anomaly::AnomalyFinding;
use crate::error::{CaliperError, Result};
use crate::profile::ColumnProfile;
use crate::quality::ColumnQualityScore;
use crate::schema::ColumnSchema;

use super::types::{Report, ReportColumn};

/// Pairs schemas, profiles and scores by column name. No recomputation.
#[derive(Debug, Default)]
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the report. Columns follow schema position order.
    ///
    /// Fails with [`CaliperError::ContractViolation`] when a column is
    /// missing from one of the inputs or a finding names an unknown column.
    pub fn assemble(
        &self,
        dataset_name: impl Into<String>,
        schemas: &[ColumnSchema],
        profiles: &[ColumnProfile],
        scores: &[ColumnQualityScore],
        anomalies: Vec<AnomalyFinding>,
        generated_at: DateTime<Utc>,
    ) -> Result<Report> {
        let mut ordered: Vec<&ColumnSchema> = schemas.iter().collect();
        ordered.sort_by_key(|s| s.position);

        let known = |name: &str| schemas.iter().any(|s| s.name == name);
        if let Some(extra) = profiles
            .iter()
            .map(|p| p.name.as_str())
            .chain(scores.iter().map(|s| s.name.as_str()))
            .find(|name| !known(name))
        {
            return Err(violation(extra, "schemas"));
        }

        let columns = ordered
            .into_iter()
            .map(|schema| {
                let profile = profiles
                    .iter()
                    .find(|p| p.name == schema.name)
                    .ok_or_else(|| violation(&schema.name, "profiles"))?;
                let score = scores
                    .iter()
                    .find(|s| s.name == schema.name)
                    .ok_or_else(|| violation(&schema.name, "scores"))?;
                Ok(ReportColumn {
                    name: schema.name.clone(),
                    schema: schema.clone(),
                    profile: profile.clone(),
                    score: score.clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(stray) = anomalies.iter().find(|a| !known(&a.field)) {
            return Err(violation(&stray.field, "schemas"));
        }

        let row_count = columns
            .iter()
            .map(|c| c.profile.total_count)
            .max()
            .unwrap_or(0);
        let dataset_name = dataset_name.into();
        debug!(
            dataset = %dataset_name,
            columns = columns.len(),
            anomalies = anomalies.len(),
            "report assembled"
        );

        Ok(Report {
            dataset_name,
            generated_at,
            row_count,
            columns,
            anomalies,
        })
    }
}

fn violation(column: &str, input: &str) -> CaliperError {
    CaliperError::ContractViolation {
        column: column.to_string(),
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::AnomalyType;
    use crate::schema::InferredType;

    fn profile(name: &str) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            inferred_type: InferredType::Text,
            total_count: 2,
            null_count: 0,
            blank_count: 0,
            distinct_count: 2,
            unparsed_count: 0,
            numeric: None,
            date_range: None,
            text: None,
        }
    }

    fn score(name: &str) -> ColumnQualityScore {
        ColumnQualityScore {
            name: name.to_string(),
            completeness_pct: 100.0,
            uniqueness_pct: None,
            validity_pct: Some(100.0),
            invalid_count: Some(0),
            overall_score: 100.0,
            expected_unique: false,
            no_data: false,
            rule: None,
            warnings: Vec::new(),
        }
    }

    fn schemas() -> Vec<ColumnSchema> {
        vec![
            ColumnSchema::new("b", 1, InferredType::Text, 1.0),
            ColumnSchema::new("a", 0, InferredType::Text, 1.0),
        ]
    }

    #[test]
    fn test_orders_columns_by_position() {
        let report = ReportAssembler::new()
            .assemble(
                "ds",
                &schemas(),
                &[profile("b"), profile("a")],
                &[score("a"), score("b")],
                Vec::new(),
                Utc::now(),
            )
            .unwrap();

        let names: Vec<&str> = report.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(report.row_count, 2);
    }

    #[test]
    fn test_missing_score_is_contract_violation() {
        let err = ReportAssembler::new()
            .assemble(
                "ds",
                &schemas(),
                &[profile("a"), profile("b")],
                &[score("a")],
                Vec::new(),
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            CaliperError::ContractViolation { ref column, ref input } if column == "b" && input == "scores"
        ));
    }

    #[test]
    fn test_finding_for_unknown_column_is_contract_violation() {
        let finding = AnomalyFinding::new("ghost", AnomalyType::MissingValues, "x");
        let err = ReportAssembler::new()
            .assemble(
                "ds",
                &schemas(),
                &[profile("a"), profile("b")],
                &[score("a"), score("b")],
                vec![finding],
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, CaliperError::ContractViolation { .. }));
    }

    #[test]
    fn test_extra_profile_is_contract_violation() {
        let err = ReportAssembler::new()
            .assemble(
                "ds",
                &schemas(),
                &[profile("a"), profile("b"), profile("c")],
                &[score("a"), score("b")],
                Vec::new(),
                Utc::now(),
            )
            .unwrap_err();
        assert!(err.to_string().contains("'c'"));
    }
}

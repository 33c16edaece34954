//! Delimited-text export of a report.

use std::io::Write;

use csv::WriterBuilder;

use crate::error::Result;

use super::types::Report;

const COLUMN_HEADER: [&str; 20] = [
    "field",
    "inferred_type",
    "confidence",
    "total_count",
    "null_count",
    "blank_count",
    "distinct_count",
    "min",
    "max",
    "median",
    "std_dev",
    "min_length",
    "max_length",
    "avg_length",
    "completeness_pct",
    "uniqueness_pct",
    "validity_pct",
    "overall_score",
    "rule",
    "warnings",
];

const ANOMALY_HEADER: [&str; 7] = [
    "field",
    "anomaly_type",
    "reason",
    "recommendation",
    "affected_count",
    "percentage",
    "tail",
];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the report as two delimited sections: one row per column, then a
/// blank line and one row per anomaly finding.
///
/// Not-applicable values are written as empty fields.
pub fn write_delimited<W: Write>(report: &Report, writer: W, delimiter: u8) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);

    wtr.write_record(COLUMN_HEADER)?;
    for column in &report.columns {
        let p = &column.profile;
        let s = &column.score;
        let numeric = p.numeric.as_ref();
        let text = p.text.as_ref();

        wtr.write_record([
            column.name.clone(),
            column.schema.inferred_type.to_string(),
            column.schema.confidence.to_string(),
            p.total_count.to_string(),
            p.null_count.to_string(),
            p.blank_count.to_string(),
            p.distinct_count.to_string(),
            opt(numeric.map(|n| n.min)),
            opt(numeric.map(|n| n.max)),
            opt(numeric.map(|n| n.median)),
            opt(numeric.map(|n| n.std_dev)),
            opt(text.map(|t| t.min_length)),
            opt(text.map(|t| t.max_length)),
            opt(text.map(|t| t.avg_length)),
            s.completeness_pct.to_string(),
            opt(s.uniqueness_pct),
            opt(s.validity_pct),
            s.overall_score.to_string(),
            opt(s.rule.as_ref()),
            s.warnings.join("; "),
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    let mut writer = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    writeln!(writer).map_err(csv::Error::from)?;

    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_writer(writer);
    wtr.write_record(ANOMALY_HEADER)?;
    for finding in &report.anomalies {
        let e = &finding.evidence;
        wtr.write_record([
            finding.field.clone(),
            finding.anomaly_type.label().to_string(),
            finding.reason.clone(),
            finding.recommendation.clone(),
            e.affected_count.to_string(),
            opt(e.percentage),
            opt(e.tail.map(|t| t.label())),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

//! End-to-end tests for the caliper binary.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

const DATA: &str = "customer_id,email,amount\n\
1,a@x.com,10\n\
2,bad,12\n\
3,,11\n\
3,c@y.com,13\n";

fn caliper_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_caliper"));
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_analyze_writes_json_report() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("orders.csv");
    fs::write(&data, DATA).unwrap();

    let output = caliper_cmd()
        .args(["analyze", data.to_str().unwrap(), "--unique", "customer_id"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report_path = dir.path().join("orders.quality.json");
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
    assert_eq!(report["dataset_name"], "orders");
    assert_eq!(report["row_count"], 4);

    let types: Vec<&str> = report["anomalies"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|a| a["anomaly_type"].as_str())
        .collect();
    assert!(types.contains(&"duplicate_key"));
    assert!(types.contains(&"pattern_violation"));
}

#[test]
fn test_analyze_csv_format_with_rules() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("orders.csv");
    let rules = dir.path().join("rules.json");
    let out = dir.path().join("report.csv");
    fs::write(&data, DATA).unwrap();
    fs::write(&rules, r#"{"amount": "1[0-9]"}"#).unwrap();

    let output = caliper_cmd()
        .args([
            "analyze",
            data.to_str().unwrap(),
            "--rules",
            rules.to_str().unwrap(),
            "--format",
            "csv",
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("field,inferred_type"));
    assert!(text.contains("assigned pattern `1[0-9]`"));
}

#[test]
fn test_catalog_command() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("orders.csv");
    fs::write(&data, DATA).unwrap();

    let output = caliper_cmd()
        .args(["catalog", data.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = fs::read_to_string(dir.path().join("orders.catalog.csv")).unwrap();
    assert!(text.contains("Unique identifier for each customer."));
}

#[test]
fn test_missing_file_exits_with_error() {
    let output = caliper_cmd()
        .args(["analyze", "/nonexistent/data.csv"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("Error: File not found"));
}

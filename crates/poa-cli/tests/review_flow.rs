//! End-to-end tests for the review pipeline.
//!
//! Drives the compiled `poa` binary over real CSV files: review output,
//! schema failures, the row-count guard, and JSON mode.

use std::fmt::Write as _;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

use poa_cli::csv;

fn poa_binary() -> String {
    env!("CARGO_BIN_EXE_poa").to_string()
}

const SAMPLE: &str = "\
Date & Time,Transaction ID,Asset Number,Source,Total SMR Usage
2025-05-01 09:00:00,,Y,S1,4
2025-05-01 09:30:00,T1,Y,S1,
2025-05-01 10:00:00,T2,X,,
2025-05-01 10:20:00,T3,X,,
2025-05-01 14:00:00,T4,X,,
2025-05-01 15:00:00,T5,Z,,
";

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let input = dir.join("may.csv");
    std::fs::write(&input, SAMPLE).unwrap();
    input
}

fn read_report(path: &Path) -> Vec<Vec<String>> {
    csv::parse(&std::fs::read_to_string(path).unwrap())
}

#[test]
fn test_review_writes_report_with_computed_columns() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());
    let output = temp.path().join("report.csv");

    let result = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .arg("--source")
        .arg("S1")
        .output()
        .expect("failed to run poa review");
    assert!(
        result.status.success(),
        "review should succeed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let report = read_report(&output);
    assert_eq!(report.len(), 7); // header + 6 rows

    let header = &report[0];
    assert_eq!(
        &header[5..],
        &[
            "No POA Asset",
            "Count of proof before transaction",
            "Time since last activity",
            "total smr",
            "Dispense with no proof"
        ]
    );

    // Proof row: gap to itself is zero, no projected metrics.
    let proof = &report[1];
    assert_eq!(proof[6], "");
    assert_eq!(proof[7], "0");

    // Y's transaction: one proof, half an hour after it, 4 usage units.
    let supported = &report[2];
    assert_eq!(supported[5], "");
    assert_eq!(supported[6], "1");
    assert_eq!(supported[7], "0.5");
    assert_eq!(supported[8], "4");
    assert_eq!(supported[9], "");

    // X never appears among proof records: flagged on every
    // transaction, each dispensed without proof.
    for row in &report[3..6] {
        assert_eq!(row[5], "No Proof of Use Asset");
        assert_eq!(row[6], "0");
        assert_eq!(row[7], "");
        assert_eq!(row[9], "Yes");
    }

    // Z likewise.
    assert_eq!(report[6][5], "No Proof of Use Asset");
    assert_eq!(report[6][9], "Yes");
}

#[test]
fn test_review_derives_output_filename() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());

    let result = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .output()
        .unwrap();
    assert!(result.status.success());

    assert!(temp.path().join("may_review.csv").exists());
}

#[test]
fn test_review_is_idempotent_over_own_output() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());

    let first = temp.path().join("first.csv");
    let status = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .arg("--output")
        .arg(&first)
        .arg("--source")
        .arg("S1")
        .status()
        .unwrap();
    assert!(status.success());

    let second = temp.path().join("second.csv");
    let status = Command::new(poa_binary())
        .arg("review")
        .arg(&first)
        .arg("--output")
        .arg(&second)
        .arg("--source")
        .arg("S1")
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap(),
        "re-reviewing the report must reproduce it byte for byte"
    );
}

#[test]
fn test_streaming_write_matches_materialized_output() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());

    let materialized = temp.path().join("materialized.csv");
    let status = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .arg("--output")
        .arg(&materialized)
        .status()
        .unwrap();
    assert!(status.success());

    // A threshold of 1 forces the row-by-row write path.
    let streamed = temp.path().join("streamed.csv");
    let status = Command::new(poa_binary())
        .env("POA_STREAM_THRESHOLD", "1")
        .arg("review")
        .arg(&input)
        .arg("--output")
        .arg(&streamed)
        .status()
        .unwrap();
    assert!(status.success());

    assert_eq!(
        std::fs::read_to_string(&materialized).unwrap(),
        std::fs::read_to_string(&streamed).unwrap(),
        "streaming and materialized writes must produce identical reports"
    );
}

#[test]
fn test_json_tolerates_closed_stdout() {
    // Enough rows that the JSON stream overflows the pipe buffer after
    // the read end closes; the run must still exit cleanly.
    let temp = TempDir::new().unwrap();
    let mut content =
        String::from("Date & Time,Transaction ID,Asset Number,Source,Total SMR Usage\n");
    for i in 0..5000 {
        writeln!(content, "2025-05-01 09:00:00,T{i},X,S1,1").unwrap();
    }
    let input = temp.path().join("big.csv");
    std::fs::write(&input, content).unwrap();

    let mut child = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .arg("--json")
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    drop(child.stdout.take());
    let status = child.wait().unwrap();
    assert!(status.success(), "a closed stdout must not be fatal");
}

#[test]
fn test_missing_required_column_is_fatal() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("broken.csv");
    std::fs::write(&input, "Date & Time,Asset Number\n2025-05-01 09:00:00,X\n").unwrap();
    let output = temp.path().join("report.csv");

    let result = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(
        stderr.contains("Transaction ID"),
        "error should name the missing column: {stderr}"
    );
    // No partial output.
    assert!(!output.exists());
}

#[test]
fn test_row_count_guard() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());

    let result = Command::new(poa_binary())
        .env("POA_MAX_ROWS", "2")
        .arg("review")
        .arg(&input)
        .output()
        .unwrap();

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("maximum 2"), "guard should name the limit: {stderr}");
}

#[test]
fn test_json_mode_emits_columns_then_decorated_rows() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());

    let result = Command::new(poa_binary())
        .arg("review")
        .arg(&input)
        .arg("--json")
        .output()
        .unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8(result.stdout).unwrap();
    let mut lines = stdout.lines();

    let header: serde_json::Value = serde_json::from_str(lines.next().unwrap()).unwrap();
    let columns = header["columns"].as_array().unwrap();
    assert_eq!(columns.last().unwrap(), "Dispense with no proof");

    let rows: Vec<serde_json::Value> = lines
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(rows.len(), 6);
    for row in &rows {
        assert_eq!(row["cells"].as_array().unwrap().len(), columns.len());
        assert!(row["data_row"].is_boolean());
        assert!(row["transaction"].is_boolean());
        assert!(row["usage_warning"].is_boolean());
    }
    // The proof row is not a transaction; the dispenses are.
    assert_eq!(rows[0]["transaction"], false);
    assert_eq!(rows[1]["transaction"], true);
}

#[test]
fn test_check_reports_schema_and_counts() {
    let temp = TempDir::new().unwrap();
    let input = write_sample(temp.path());

    let result = Command::new(poa_binary())
        .arg("check")
        .arg(&input)
        .output()
        .unwrap();
    assert!(result.status.success());

    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("transactions    5"));
    assert!(stdout.contains("proof records   1"));
}

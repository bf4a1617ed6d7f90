//! Integration tests for the full EDA pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use datascope::{EdaPipeline, PipelineStage};

/// Write a data file into a fresh temp dir and return both paths.
fn write_input(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write input file");
    path
}

fn read_summary(output_dir: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(output_dir.join("eda_summary.json"))
        .expect("Summary file should exist");
    serde_json::from_str(&raw).expect("Summary should be valid JSON")
}

// =============================================================================
// Full Pipeline Tests
// =============================================================================

#[test]
fn test_full_pipeline_produces_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(
        &dir,
        "data.csv",
        "id,age,city\n1,25,NYC\n2,30,LA\n3,28,NYC\n4,NA,SF\n",
    );
    let out = dir.path().join("eda_output");

    let mut pipeline = EdaPipeline::new(&input, &out, true);
    let (html_path, json_path) = pipeline.run().expect("Pipeline failed");

    assert_eq!(pipeline.stage(), PipelineStage::Done);
    assert!(html_path.exists());
    assert!(json_path.exists());
    assert!(out.join("plots").join("missing_data.png").exists());
    assert!(out.join("reports").join("column_profile.html").exists());

    let summary = read_summary(&out);
    for section in [
        "basic_info",
        "basic_stats",
        "missing_data",
        "unique_values",
        "numeric_statistics",
        "categorical_statistics",
        "outliers",
        "visualizations",
    ] {
        assert!(summary.get(section).is_some(), "Missing section {section}");
    }

    assert_eq!(summary["basic_stats"]["total_rows"], 4);
    assert_eq!(summary["basic_stats"]["total_columns"], 3);
    assert_eq!(summary["basic_stats"]["total_missing_values"], 1);

    let html = fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("Dataset Overview"));
    assert!(html.contains("Key Findings"));
    assert!(html.contains("plots/missing_data.png"));
}

#[test]
fn test_profiling_disabled_skips_profile_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "data.csv", "a,b\n1,x\n2,y\n");
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.run().expect("Pipeline failed");

    assert!(!out.join("reports").join("column_profile.html").exists());
    assert!(out.join("eda_report.html").exists());
}

#[test]
fn test_load_failure_leaves_no_report() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(dir.path().join("missing.csv"), &out, false);
    assert!(pipeline.run().is_err());

    assert_eq!(pipeline.stage(), PipelineStage::Failed);
    assert!(!out.join("eda_report.html").exists());
    assert!(!out.join("eda_summary.json").exists());
}

#[test]
fn test_stages_callable_individually_after_load() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "data.csv", "v\n1\n2\n3\n");
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.load().expect("Load failed");
    assert_eq!(pipeline.stage(), PipelineStage::Loaded);

    pipeline.detect_outliers().expect("Outliers failed");
    assert_eq!(pipeline.stage(), PipelineStage::OutliersComputed);
    assert!(pipeline.results().outliers.is_some());
    assert!(pipeline.results().basic_stats.is_none());
}

// =============================================================================
// Scenario Tests
// =============================================================================

#[test]
fn test_constant_column_scenario() {
    // 100 identical two-column rows: rows are duplicates of the first.
    let mut content = String::from("value,label\n");
    for _ in 0..100 {
        content.push_str("5,x\n");
    }

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "constant.csv", &content);
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.run().expect("Pipeline failed");

    let summary = read_summary(&out);
    assert_eq!(summary["basic_stats"]["total_rows"], 100);
    assert_eq!(summary["basic_stats"]["duplicate_rows"], 99);
    assert_eq!(summary["basic_stats"]["missing_percentage"], 0.0);

    let value_stats = &summary["numeric_statistics"]["value"];
    assert_eq!(value_stats["mean"], 5.0);
    assert_eq!(value_stats["std"], 0.0);
    assert_eq!(value_stats["variance"], 0.0);
    assert!(value_stats["skewness"].is_null());
    assert!(value_stats["kurtosis"].is_null());

    assert_eq!(summary["outliers"]["iqr"]["value"]["count"], 0);
    assert_eq!(summary["outliers"]["zscore"]["value"]["count"], 0);
}

#[test]
fn test_single_extreme_value_flagged_by_both_methods() {
    // 99 values in 10..=20, one extreme value at a known row.
    let mut content = String::from("v\n");
    for i in 0..99 {
        if i == 42 {
            content.push_str("10000\n");
        }
        content.push_str(&format!("{}\n", 10 + i % 11));
    }

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "extreme.csv", &content);
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.run().expect("Pipeline failed");

    let summary = read_summary(&out);
    for method in ["iqr", "zscore"] {
        let record = &summary["outliers"][method]["v"];
        assert_eq!(record["count"], 1, "{method} should flag exactly one row");
        assert_eq!(record["indices"][0], 42);
        assert_eq!(record["percentage"], 1.0);
    }
}

#[test]
fn test_dominant_categorical_value_scenario() {
    let mut content = String::from("status\n");
    for _ in 0..60 {
        content.push_str("approved\n");
    }
    for _ in 0..25 {
        content.push_str("rejected\n");
    }
    for _ in 0..15 {
        content.push_str("pending\n");
    }

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "cat.csv", &content);
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.run().expect("Pipeline failed");

    let summary = read_summary(&out);
    let stats = &summary["categorical_statistics"]["status"];
    assert_eq!(stats["most_frequent"], "approved");
    assert_eq!(stats["most_frequent_count"], 60);
    assert_eq!(stats["least_frequent"], "pending");

    let top = stats["top_values"].as_object().unwrap();
    let total: u64 = top.values().map(|v| v.as_u64().unwrap()).sum();
    assert!(total <= 100);

    let counts: Vec<u64> = top.values().map(|v| v.as_u64().unwrap()).collect();
    let mut sorted = counts.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted, "top values must be sorted descending");
}

#[test]
fn test_header_only_table_loads_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "empty.csv", "a,b,c\n");
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.run().expect("A 0-row table should still report");

    let summary = read_summary(&out);
    assert_eq!(summary["basic_stats"]["total_rows"], 0);
    assert_eq!(summary["basic_stats"]["missing_percentage"], 0.0);
    assert_eq!(summary["basic_stats"]["duplicate_rows"], 0);
}

#[test]
fn test_tsv_auto_detection() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "data.tsv", "id\tscore\n1\t10\n2\t20\n3\t30\n");
    let out = dir.path().join("out");

    let mut pipeline = EdaPipeline::new(&input, &out, false);
    pipeline.run().expect("Pipeline failed");

    let summary = read_summary(&out);
    assert_eq!(summary["basic_info"]["format"], "tsv");
    assert_eq!(summary["basic_stats"]["numeric_columns"], 2);
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_rerun_is_deterministic_modulo_timestamp() {
    let content = "id,age,city\n1,25,NYC\n2,30,LA\n3,NA,SF\n4,41,NYC\n";
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(&dir, "data.csv", content);
    let out = dir.path().join("out");

    let mut first_run = EdaPipeline::new(&input, &out, false);
    first_run.run().expect("First run failed");
    let mut first = read_summary(&out);

    let mut second_run = EdaPipeline::new(&input, &out, false);
    second_run.run().expect("Second run failed");
    let mut second = read_summary(&out);

    // The load timestamp is the only value expected to differ.
    first["basic_info"]
        .as_object_mut()
        .unwrap()
        .remove("loaded_at");
    second["basic_info"]
        .as_object_mut()
        .unwrap()
        .remove("loaded_at");

    assert_eq!(first, second);
}

//! Integration tests for the full analysis workflow
//!
//! These tests load the fixture files under `testdata/` and check the
//! end-to-end results through the public API.

use datalens::analyser::logic::{
    self, InsightRule, Statistic, compute_category_group_statistics, compute_column_statistics,
    generate_insights, load_table, run_full_analysis,
};
use datalens::config::{InsightConfig, load_config};
use datalens::error::AnalysisError;
use std::path::Path;

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
}

#[test]
fn test_load_employees_csv() -> anyhow::Result<()> {
    let df = load_table(&fixture("employees.csv"))?;
    assert_eq!(df.height(), 10, "Should have 10 rows");
    assert_eq!(df.width(), 4, "Should have 4 columns");

    let overview = logic::describe_dataset(&df)?;
    assert_eq!(overview.numeric_columns, vec!["age", "salary"]);
    assert_eq!(overview.categorical_columns, vec!["department", "name"]);
    assert_eq!(overview.total_missing(), 0);
    Ok(())
}

#[test]
fn test_employee_statistics_and_groups() -> anyhow::Result<()> {
    let df = load_table(&fixture("employees.csv"))?;

    let age = compute_column_statistics(&df, "age")?;
    assert_eq!(age.count, 10);
    assert!((age.mean - 39.0).abs() < 1e-9, "mean was {}", age.mean);
    assert!((age.range - 18.0).abs() < 1e-9);

    let groups = compute_category_group_statistics(&df, "age", "department")?;
    let means: Vec<(&str, f64)> = groups
        .groups
        .iter()
        .filter_map(|(k, v)| match v {
            Statistic::Defined(s) => Some((k.as_str(), s.mean)),
            Statistic::Undefined(_) => None,
        })
        .collect();
    assert_eq!(means.len(), 3);
    for (dept, expected) in [("Eng", 106.0 / 3.0), ("Ops", 130.0 / 3.0), ("Sales", 38.5)] {
        let actual = means
            .iter()
            .find(|(k, _)| *k == dept)
            .map(|(_, m)| *m)
            .unwrap_or(f64::NAN);
        assert!((actual - expected).abs() < 1e-9, "{dept}: {actual}");
    }
    Ok(())
}

#[test]
fn test_full_report_on_employees() -> anyhow::Result<()> {
    let df = load_table(&fixture("employees.csv"))?;
    let report = run_full_analysis(&df, &InsightConfig::default())?;

    assert_eq!(report.statistics.len(), 2);
    assert!(report.statistics.values().all(Statistic::is_defined));

    let top = report.ranked_correlations.first().expect("one pair");
    assert_eq!((top.left.as_str(), top.right.as_str()), ("age", "salary"));
    assert!((top.coefficient - 1.0).abs() < 1e-9);

    let groups = report.category_analysis.as_ref().expect("age by department");
    assert_eq!(groups.numeric_column, "age");
    assert_eq!(groups.category_column, "department");

    let strong: Vec<&str> = report
        .insights
        .by_rule(InsightRule::StrongCorrelation)
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(strong, vec!["Strong correlation between age and salary: 1.000"]);

    let text = report.render_text();
    assert!(text.contains("DATASET OVERVIEW"));
    assert!(text.contains("AGE BY DEPARTMENT"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
    assert_eq!(json["overview"]["row_count"], 10);
    Ok(())
}

#[test]
fn test_missing_values_csv() -> anyhow::Result<()> {
    let df = load_table(&fixture("missing_values.csv"))?;
    assert_eq!(df.height(), 5);

    let age = compute_column_statistics(&df, "age")?;
    assert_eq!(age.count, 4, "Empty cell should be excluded");
    assert!((age.mean - 29.5).abs() < 1e-9);

    let report = generate_insights(&df, &InsightConfig::default())?;
    let completeness: Vec<&str> = report
        .by_rule(InsightRule::Completeness)
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(
        completeness,
        vec!["Found 3 missing values across 3 columns: age (1), score (1), city (1)"]
    );
    Ok(())
}

#[test]
fn test_config_file_changes_insights() -> anyhow::Result<()> {
    let config = load_config(&fixture("config.json"))?;
    assert_eq!(config.cardinality_ceiling, 3);
    assert_eq!(
        config.histogram_bins,
        InsightConfig::default().histogram_bins,
        "Unset fields keep defaults"
    );

    let df = load_table(&fixture("employees.csv"))?;
    let report = generate_insights(&df, &config)?;
    let categories: Vec<&str> = report
        .by_rule(InsightRule::CategoryCardinality)
        .map(|i| i.message.as_str())
        .collect();
    assert_eq!(categories, vec!["department has 3 unique categories"]);
    Ok(())
}

#[test]
fn test_invalid_file_returns_error() {
    let result = load_table(&fixture("invalid_format.txt"));
    assert!(
        matches!(result, Err(AnalysisError::DataProcessing(_))),
        "Invalid file format should return error"
    );
}

#[test]
fn test_nonexistent_file_returns_error() {
    let result = load_table(&fixture("does_not_exist.csv"));
    assert!(
        matches!(result, Err(AnalysisError::Io(_))),
        "Non-existent file should return error"
    );
}

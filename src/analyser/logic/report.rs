use super::correlation::{compute_correlation_matrix, rank_correlations};
use super::grouping::compute_category_group_statistics;
use super::insights::{InsightReport, generate_insights};
use super::overview::describe_dataset;
use super::profiling::compute_all_columns_statistics;
use super::types::{
    CategoryGroupStatistics, ColumnStatistics, CorrelationMatrix, CorrelationPair,
    DatasetOverview, Statistic,
};
use crate::config::InsightConfig;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the tool knows about a table, in one value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub overview: DatasetOverview,
    pub statistics: BTreeMap<String, Statistic<ColumnStatistics>>,
    pub correlation: CorrelationMatrix,
    pub ranked_correlations: Vec<CorrelationPair>,
    /// First numeric column grouped by the first categorical column.
    pub category_analysis: Option<CategoryGroupStatistics>,
    pub insights: InsightReport,
}

pub fn run_full_analysis(df: &DataFrame, config: &InsightConfig) -> Result<AnalysisReport> {
    let start = std::time::Instant::now();

    let overview = describe_dataset(df)?;
    let statistics = compute_all_columns_statistics(df)?;
    let correlation = compute_correlation_matrix(df)?;
    let ranked_correlations = rank_correlations(&correlation, config);

    let category_analysis = match (
        overview.numeric_columns.first(),
        overview.categorical_columns.first(),
    ) {
        (Some(numeric), Some(category)) => {
            match compute_category_group_statistics(df, numeric, category) {
                Ok(groups) => Some(groups),
                Err(AnalysisError::EmptyColumn { column }) => {
                    log::warn!("Category analysis skipped: '{column}' has no values");
                    None
                }
                Err(e) => return Err(e),
            }
        }
        _ => None,
    };

    let insights = generate_insights(df, config)?;

    log::info!(
        "Analysed {} rows x {} columns in {:?}",
        overview.row_count,
        overview.column_count,
        start.elapsed()
    );

    Ok(AnalysisReport {
        overview,
        statistics,
        correlation,
        ranked_correlations,
        category_analysis,
        insights,
    })
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering used by the command line.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        render_overview(&mut out, &self.overview);

        out.push_str("\nSTATISTICS\n");
        for (name, entry) in &self.statistics {
            render_statistic_entry(&mut out, name, entry);
        }

        if !self.ranked_correlations.is_empty() {
            out.push_str("\nCORRELATIONS\n");
            for pair in &self.ranked_correlations {
                out.push_str(&format!(
                    "  {} <-> {}: {:.3} ({})\n",
                    pair.left,
                    pair.right,
                    pair.coefficient,
                    pair.strength.as_str()
                ));
            }
        }

        if let Some(groups) = &self.category_analysis {
            render_groups(&mut out, groups);
        }

        out.push_str("\nINSIGHTS\n");
        for line in self.insights.to_lines() {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

pub fn render_overview(out: &mut String, overview: &DatasetOverview) {
    out.push_str("DATASET OVERVIEW\n");
    out.push_str(&format!(
        "  Shape: {} rows x {} columns\n",
        overview.row_count, overview.column_count
    ));
    out.push_str(&format!(
        "  Memory usage: {:.2} KB\n",
        overview.estimated_size_bytes as f64 / 1024.0
    ));
    for (i, col) in overview.columns.iter().enumerate() {
        out.push_str(&format!(
            "  {:2}. {:<20} ({}, {}) - Missing: {}\n",
            i + 1,
            col.name,
            col.dtype,
            col.kind.as_str(),
            col.missing
        ));
    }
    out.push_str(&format!(
        "  Numeric columns ({}): {}\n",
        overview.numeric_columns.len(),
        overview.numeric_columns.join(", ")
    ));
    out.push_str(&format!(
        "  Categorical columns ({}): {}\n",
        overview.categorical_columns.len(),
        overview.categorical_columns.join(", ")
    ));
}

pub fn render_statistics(out: &mut String, name: &str, s: &ColumnStatistics) {
    let rows = [
        ("Count", s.count.to_string()),
        ("Mean", format!("{:.2}", s.mean)),
        ("Median", format!("{:.2}", s.median)),
        ("Std Dev", fmt_stat(&s.std_dev)),
        ("Min", format!("{:.2}", s.min)),
        ("Max", format!("{:.2}", s.max)),
        ("Q1 (25%)", format!("{:.2}", s.q1)),
        ("Q3 (75%)", format!("{:.2}", s.q3)),
        ("Range", format!("{:.2}", s.range)),
        ("Variance", fmt_stat(&s.variance)),
        ("Skewness", fmt_stat(&s.skewness)),
        ("Kurtosis", fmt_stat(&s.kurtosis)),
    ];
    out.push_str(&format!("  '{name}':\n"));
    for (label, value) in rows {
        out.push_str(&format!("    {:<10}{value:>12}\n", format!("{label}:")));
    }
}

pub fn render_statistic_entry(out: &mut String, name: &str, entry: &Statistic<ColumnStatistics>) {
    match entry {
        Statistic::Defined(stats) => render_statistics(out, name, stats),
        Statistic::Undefined(reason) => {
            out.push_str(&format!("  '{name}': undefined ({reason})\n"));
        }
    }
}

pub fn render_groups(out: &mut String, groups: &CategoryGroupStatistics) {
    out.push_str(&format!(
        "\n{} BY {}\n",
        groups.numeric_column.to_uppercase(),
        groups.category_column.to_uppercase()
    ));
    for (category, entry) in &groups.groups {
        let line = match entry {
            Statistic::Defined(s) => format!(
                "  {category:<16} count {:>5}  mean {:>10.2}  median {:>10.2}  std {:>10}  min {:>10.2}  max {:>10.2}\n",
                s.count,
                s.mean,
                s.median,
                fmt_stat(&s.std_dev),
                s.min,
                s.max
            ),
            Statistic::Undefined(reason) => format!("  {category:<16} undefined ({reason})\n"),
        };
        out.push_str(&line);
    }
}

/// Two decimals, or "undefined".
pub fn fmt_stat(stat: &Statistic<f64>) -> String {
    format!("{stat:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_lines(stats: &ColumnStatistics) -> Vec<Vec<String>> {
        let mut out = String::new();
        render_statistics(&mut out, "Age", stats);
        out.lines()
            .map(|l| l.split_whitespace().map(str::to_owned).collect())
            .collect()
    }

    #[test]
    fn test_statistics_text_marks_undefined() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![Column::from(Series::new("Age".into(), vec![41.0]))])?;
        let stats = super::super::profiling::compute_column_statistics(&df, "Age")?;
        let lines = stats_lines(&stats);

        assert_eq!(lines.len(), 13, "header plus twelve rows");
        assert!(lines.contains(&vec!["Mean:".to_owned(), "41.00".to_owned()]));
        assert!(lines.contains(&vec![
            "Std".to_owned(),
            "Dev:".to_owned(),
            "undefined".to_owned()
        ]));
        Ok(())
    }

    #[test]
    fn test_full_text_has_every_section() -> anyhow::Result<()> {
        let df = DataFrame::new(vec![
            Column::from(Series::new("x".into(), vec![1.0, 2.0, 3.0])),
            Column::from(Series::new("y".into(), vec![2.0, 4.0, 7.0])),
            Column::from(Series::new("team".into(), vec!["a", "b", "a"])),
        ])?;
        let text = run_full_analysis(&df, &InsightConfig::default())?.render_text();

        for heading in ["DATASET OVERVIEW", "STATISTICS", "CORRELATIONS", "X BY TEAM", "INSIGHTS"] {
            assert!(text.contains(heading), "missing {heading} in:\n{text}");
        }
        assert!(text.ends_with('\n'), "every line is terminated");
        Ok(())
    }
}

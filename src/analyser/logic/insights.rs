//! Rule-based observations about a whole table.
//!
//! The table is scanned once into a [`TableScan`]; a fixed list of rules is
//! then evaluated against it in order. A rule may produce nothing, a single
//! observation, or one observation per qualifying column or pair. A rule
//! that fails is logged and skipped so the rules after it still run.

use super::correlation::{correlation_matrix_from_values, rank_correlations};
use super::overview::distinct_count;
use super::profiling::statistics_from_values;
use super::table;
use super::types::{ColumnKind, CorrelationStrength};
use crate::config::InsightConfig;
use crate::error::Result;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightRule {
    Shape,
    Completeness,
    NumericColumns,
    CategoricalColumns,
    CategoryCardinality,
    StrongCorrelation,
    Variability,
}

impl InsightRule {
    pub fn topic(&self) -> InsightTopic {
        match self {
            Self::Shape | Self::NumericColumns | Self::CategoricalColumns => InsightTopic::Count,
            Self::Completeness => InsightTopic::Quality,
            Self::CategoryCardinality => InsightTopic::Category,
            Self::StrongCorrelation => InsightTopic::Correlation,
            Self::Variability => InsightTopic::Variability,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightTopic {
    Count,
    Quality,
    Category,
    Correlation,
    Variability,
}

impl InsightTopic {
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Count => "📊",
            Self::Quality => "🔍",
            Self::Category => "🏷️",
            Self::Correlation => "🔗",
            Self::Variability => "📈",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub rule: InsightRule,
    pub message: String,
}

impl Insight {
    pub fn topic(&self) -> InsightTopic {
        self.rule.topic()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
}

impl InsightReport {
    pub fn len(&self) -> usize {
        self.insights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Insight> {
        self.insights.iter()
    }

    pub fn by_rule(&self, rule: InsightRule) -> impl Iterator<Item = &Insight> + '_ {
        self.insights.iter().filter(move |i| i.rule == rule)
    }

    /// Numbered display lines, one per insight, in report order.
    pub fn to_lines(&self) -> Vec<String> {
        self.insights
            .iter()
            .enumerate()
            .map(|(i, insight)| {
                format!(
                    "{:2}. {} {}",
                    i + 1,
                    insight.topic().marker(),
                    insight.message
                )
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a InsightReport {
    type Item = &'a Insight;
    type IntoIter = std::slice::Iter<'a, Insight>;

    fn into_iter(self) -> Self::IntoIter {
        self.insights.iter()
    }
}

/// What the rules know about one column.
#[derive(Clone, Debug)]
pub struct ScannedColumn {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    pub distinct: usize,
    /// Row-aligned values, numeric columns only.
    pub values: Option<Vec<Option<f64>>>,
}

/// Everything the rules need, gathered in one pass over the table.
#[derive(Clone, Debug)]
pub struct TableScan {
    pub rows: usize,
    pub columns: Vec<ScannedColumn>,
}

impl TableScan {
    pub fn of_kind(&self, kind: ColumnKind) -> impl Iterator<Item = &ScannedColumn> + '_ {
        self.columns.iter().filter(move |c| c.kind == kind)
    }
}

pub fn scan_table(df: &DataFrame) -> Result<TableScan> {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let kind = table::column_kind(col);
            let values = match kind {
                ColumnKind::Numeric => Some(table::numeric_values(col)?),
                ColumnKind::Categorical => None,
            };
            let missing = match &values {
                Some(v) => v.iter().filter(|x| x.is_none()).count(),
                None => col.null_count(),
            };
            let distinct = match kind {
                ColumnKind::Categorical => distinct_count(col)?,
                ColumnKind::Numeric => 0,
            };
            Ok(ScannedColumn {
                name: col.name().to_string(),
                kind,
                missing,
                distinct,
                values,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TableScan {
        rows: df.height(),
        columns,
    })
}

type RuleFn = fn(&TableScan, &InsightConfig) -> Result<Vec<String>>;

/// Evaluation order is report order.
const RULE_ORDER: [InsightRule; 7] = [
    InsightRule::Shape,
    InsightRule::Completeness,
    InsightRule::NumericColumns,
    InsightRule::CategoricalColumns,
    InsightRule::CategoryCardinality,
    InsightRule::StrongCorrelation,
    InsightRule::Variability,
];

fn evaluator(rule: InsightRule) -> RuleFn {
    match rule {
        InsightRule::Shape => shape,
        InsightRule::Completeness => completeness,
        InsightRule::NumericColumns => numeric_columns,
        InsightRule::CategoricalColumns => categorical_columns,
        InsightRule::CategoryCardinality => category_cardinality,
        InsightRule::StrongCorrelation => strong_correlations,
        InsightRule::Variability => variability,
    }
}

/// Scans the table and runs every rule in order.
pub fn generate_insights(df: &DataFrame, config: &InsightConfig) -> Result<InsightReport> {
    let scan = scan_table(df)?;
    Ok(evaluate_rules(&scan, config))
}

/// Numbered, marker-prefixed lines of [`generate_insights`].
pub fn generate_insights_text(df: &DataFrame, config: &InsightConfig) -> Result<Vec<String>> {
    Ok(generate_insights(df, config)?.to_lines())
}

pub fn evaluate_rules(scan: &TableScan, config: &InsightConfig) -> InsightReport {
    let mut insights = Vec::new();
    for rule in RULE_ORDER {
        match evaluate_rule(rule, scan, config) {
            Ok(found) => insights.extend(found),
            Err(e) => log::warn!("Insight rule {rule:?} skipped: {e}"),
        }
    }
    InsightReport { insights }
}

/// Runs a single rule, for callers that want one kind of observation.
pub fn evaluate_rule(
    rule: InsightRule,
    scan: &TableScan,
    config: &InsightConfig,
) -> Result<Vec<Insight>> {
    Ok(evaluator(rule)(scan, config)?
        .into_iter()
        .map(|message| Insight { rule, message })
        .collect())
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn shape(scan: &TableScan, _config: &InsightConfig) -> Result<Vec<String>> {
    Ok(vec![format!(
        "Dataset contains {}, {}",
        plural(scan.rows, "record", "records"),
        plural(scan.columns.len(), "feature", "features")
    )])
}

fn completeness(scan: &TableScan, _config: &InsightConfig) -> Result<Vec<String>> {
    let affected: Vec<&ScannedColumn> = scan.columns.iter().filter(|c| c.missing > 0).collect();
    if affected.is_empty() {
        return Ok(vec!["Dataset has no missing values".to_owned()]);
    }
    let total: usize = affected.iter().map(|c| c.missing).sum();
    let names = affected
        .iter()
        .map(|c| format!("{} ({})", c.name, c.missing))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(vec![format!(
        "Found {} across {}: {names}",
        plural(total, "missing value", "missing values"),
        plural(affected.len(), "column", "columns")
    )])
}

fn numeric_columns(scan: &TableScan, _config: &InsightConfig) -> Result<Vec<String>> {
    let count = scan.of_kind(ColumnKind::Numeric).count();
    if count == 0 {
        return Ok(Vec::new());
    }
    Ok(vec![format!(
        "Dataset has {} for quantitative analysis",
        plural(count, "numeric column", "numeric columns")
    )])
}

fn categorical_columns(scan: &TableScan, _config: &InsightConfig) -> Result<Vec<String>> {
    let count = scan.of_kind(ColumnKind::Categorical).count();
    if count == 0 {
        return Ok(Vec::new());
    }
    Ok(vec![format!(
        "Dataset has {}",
        plural(count, "categorical column", "categorical columns")
    )])
}

/// Single-valued columns and columns above the ceiling are not summarised.
fn category_cardinality(scan: &TableScan, config: &InsightConfig) -> Result<Vec<String>> {
    Ok(scan
        .of_kind(ColumnKind::Categorical)
        .filter(|c| (2..=config.cardinality_ceiling).contains(&c.distinct))
        .map(|c| format!("{} has {} unique categories", c.name, c.distinct))
        .collect())
}

fn strong_correlations(scan: &TableScan, config: &InsightConfig) -> Result<Vec<String>> {
    let (names, values): (Vec<String>, Vec<Vec<Option<f64>>>) = scan
        .of_kind(ColumnKind::Numeric)
        .filter_map(|c| c.values.clone().map(|v| (c.name.clone(), v)))
        .unzip();
    if names.len() < 2 {
        return Ok(Vec::new());
    }

    let matrix = correlation_matrix_from_values(names, &values);
    Ok(rank_correlations(&matrix, config)
        .into_iter()
        .filter(|pair| pair.strength == CorrelationStrength::Strong)
        .map(|pair| {
            format!(
                "Strong correlation between {} and {}: {:.3}",
                pair.left, pair.right, pair.coefficient
            )
        })
        .collect())
}

/// Columns whose mean is zero, or whose spread is undefined, are skipped.
fn variability(scan: &TableScan, config: &InsightConfig) -> Result<Vec<String>> {
    let mut messages = Vec::new();
    for col in scan.of_kind(ColumnKind::Numeric) {
        let present: Vec<f64> = col.values.iter().flatten().flatten().copied().collect();
        if present.is_empty() {
            continue;
        }
        let stats = match statistics_from_values(&col.name, present) {
            Ok(stats) => stats,
            Err(e) => {
                log::warn!("Variability check skipped for '{}': {e}", col.name);
                continue;
            }
        };
        if let Some(cv) = stats.coefficient_of_variation()
            && cv > config.variability_threshold
        {
            messages.push(format!("{} shows high variability (CV: {cv:.2})", col.name));
        }
    }
    Ok(messages)
}

//! Plot-ready data for the chart renderer.
//!
//! Nothing here draws; each function returns a serialisable description of
//! one chart (bar, histogram, scatter, heatmap) built from the table.

use super::correlation::{compute_correlation_matrix, pearson};
use super::overview::category_breakdown;
use super::profiling::statistics_from_values;
use super::table;
use super::types::{CategoryShare, Statistic};
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const MISSING_SERIES_LABEL: &str = "(missing)";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub column: String,
    pub bars: Vec<CategoryShare>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub median: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    /// Colour-group value, `None` when the plot is not grouped.
    pub label: Option<String>,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScatterPlot {
    pub x: String,
    pub y: String,
    pub colour: Option<String>,
    pub series: Vec<ScatterSeries>,
    pub correlation: Statistic<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    pub labels: Vec<String>,
    /// `None` where the coefficient is undefined.
    pub cells: Vec<Vec<Option<f64>>>,
}

pub fn bar_chart(df: &DataFrame, column: &str) -> Result<BarChart> {
    Ok(BarChart {
        column: column.to_owned(),
        bars: category_breakdown(df, column)?,
    })
}

/// Equal-width bins spanning the column's range.
///
/// A constant column yields one bin of width 1 centred on the value.
pub fn histogram(df: &DataFrame, column: &str, bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(AnalysisError::Config(
            "A histogram needs at least one bin".to_owned(),
        ));
    }
    let values = table::present_values(table::numeric_column(df, column)?)?;
    let stats = statistics_from_values(column, values.clone())?;

    let bins = if stats.range > 0.0 {
        let width = stats.range / bins as f64;
        let mut counts = vec![0usize; bins];
        for v in &values {
            let idx = (((v - stats.min) / width).floor() as usize).min(bins - 1);
            if let Some(c) = counts.get_mut(idx) {
                *c += 1;
            }
        }
        counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| HistogramBin {
                lower: stats.min + i as f64 * width,
                upper: stats.min + (i + 1) as f64 * width,
                count,
            })
            .collect()
    } else {
        vec![HistogramBin {
            lower: stats.min - 0.5,
            upper: stats.min + 0.5,
            count: values.len(),
        }]
    };

    Ok(Histogram {
        column: column.to_owned(),
        bins,
        mean: stats.mean,
        median: stats.median,
    })
}

/// Points where both coordinates are present, optionally grouped by colour.
pub fn scatter(df: &DataFrame, x: &str, y: &str, colour: Option<&str>) -> Result<ScatterPlot> {
    let xs = table::numeric_values(table::numeric_column(df, x)?)?;
    let ys = table::numeric_values(table::numeric_column(df, y)?)?;
    let labels = match colour {
        Some(name) => Some(table::text_values(table::find_column(df, name)?)?),
        None => None,
    };

    let mut series: Vec<ScatterSeries> = Vec::new();
    let mut index: HashMap<Option<String>, usize> = HashMap::new();
    for (row, (px, py)) in xs.iter().zip(&ys).enumerate() {
        let (Some(px), Some(py)) = (px, py) else {
            continue;
        };
        let label = labels.as_ref().map(|l| {
            l.get(row)
                .cloned()
                .flatten()
                .unwrap_or_else(|| MISSING_SERIES_LABEL.to_owned())
        });
        let slot = *index.entry(label.clone()).or_insert_with(|| {
            series.push(ScatterSeries {
                label,
                points: Vec::new(),
            });
            series.len() - 1
        });
        if let Some(s) = series.get_mut(slot) {
            s.points.push((*px, *py));
        }
    }

    Ok(ScatterPlot {
        x: x.to_owned(),
        y: y.to_owned(),
        colour: colour.map(str::to_owned),
        series,
        correlation: pearson(&xs, &ys),
    })
}

pub fn heatmap(df: &DataFrame) -> Result<Heatmap> {
    let matrix = compute_correlation_matrix(df)?;
    let cells = matrix
        .data
        .iter()
        .map(|row| row.iter().map(Statistic::value).collect())
        .collect();
    Ok(Heatmap {
        labels: matrix.columns,
        cells,
    })
}

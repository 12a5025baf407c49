use super::table;
use super::types::{
    ColumnKind, CorrelationMatrix, CorrelationPair, CorrelationStrength, Statistic,
    UndefinedReason,
};
use crate::config::InsightConfig;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::cmp::Ordering;

const MIN_JOINT_ROWS: usize = 2;

/// Pearson correlation between every pair of numeric columns.
///
/// Each pair uses only the rows where both columns are present. Pairs with
/// fewer than two such rows, or where either side is constant, are marked
/// undefined; the diagonal is always 1.
pub fn compute_correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let columns = table::column_names_of_kind(df, ColumnKind::Numeric);
    let values = columns
        .iter()
        .map(|name| table::numeric_values(table::find_column(df, name)?))
        .collect::<Result<Vec<_>>>()?;
    Ok(correlation_matrix_from_values(columns, &values))
}

/// Builds the matrix from row-aligned values, one vector per column.
pub(crate) fn correlation_matrix_from_values(
    columns: Vec<String>,
    values: &[Vec<Option<f64>>],
) -> CorrelationMatrix {
    let n = columns.len();
    let mut data = vec![vec![Statistic::Defined(1.0); n]; n];
    for (i, xs) in values.iter().enumerate() {
        for (j, ys) in values.iter().enumerate().skip(i + 1) {
            let r = pearson(xs, ys);
            if let Statistic::Undefined(reason) = &r
                && let (Some(left), Some(right)) = (columns.get(i), columns.get(j))
            {
                log::debug!("Correlation of '{left}' and '{right}' is undefined: {reason}");
            }
            if let Some(cell) = data.get_mut(j).and_then(|row| row.get_mut(i)) {
                *cell = r.clone();
            }
            if let Some(cell) = data.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = r;
            }
        }
    }
    CorrelationMatrix { columns, data }
}

/// Pearson correlation of a single pair of numeric columns.
///
/// # Errors
///
/// `ColumnNotFound`/`NotNumeric` for either column, and `InsufficientData`
/// when the pair has no defined coefficient.
pub fn pearson_correlation(df: &DataFrame, left: &str, right: &str) -> Result<f64> {
    let xs = table::numeric_values(table::numeric_column(df, left)?)?;
    let ys = table::numeric_values(table::numeric_column(df, right)?)?;
    if left == right {
        return Ok(1.0);
    }
    match pearson(&xs, &ys) {
        Statistic::Defined(r) => Ok(r),
        Statistic::Undefined(reason) => Err(AnalysisError::InsufficientData {
            left: left.to_owned(),
            right: right.to_owned(),
            reason,
        }),
    }
}

/// Pairwise-complete Pearson coefficient of two row-aligned columns.
pub(crate) fn pearson(xs: &[Option<f64>], ys: &[Option<f64>]) -> Statistic<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < MIN_JOINT_ROWS {
        return Statistic::Undefined(UndefinedReason::TooFewValues {
            required: MIN_JOINT_ROWS,
            actual: pairs.len(),
        });
    }

    // Exact comparison: a rounded mean leaves a tiny nonzero spread.
    if is_constant(pairs.iter().map(|p| p.0)) || is_constant(pairs.iter().map(|p| p.1)) {
        return Statistic::Undefined(UndefinedReason::ZeroVariance);
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }


    Statistic::Defined((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

/// Every defined off-diagonal pair, strongest first.
///
/// Ties in magnitude are ordered by the pair's column names.
pub fn rank_correlations(matrix: &CorrelationMatrix, config: &InsightConfig) -> Vec<CorrelationPair> {
    let mut ranked: Vec<CorrelationPair> = matrix
        .pairs()
        .filter_map(|(left, right, r)| {
            let coefficient = r.value()?;
            Some(CorrelationPair {
                left: left.to_owned(),
                right: right.to_owned(),
                coefficient,
                strength: classify(coefficient, config),
            })
        })
        .collect();
    ranked.sort_by(compare_by_magnitude);
    ranked
}

pub(crate) fn compare_by_magnitude(a: &CorrelationPair, b: &CorrelationPair) -> Ordering {
    b.coefficient
        .abs()
        .total_cmp(&a.coefficient.abs())
        .then_with(|| (&a.left, &a.right).cmp(&(&b.left, &b.right)))
}

fn classify(coefficient: f64, config: &InsightConfig) -> CorrelationStrength {
    let magnitude = coefficient.abs();
    if magnitude > config.correlation_threshold {
        CorrelationStrength::Strong
    } else if magnitude > config.moderate_correlation_threshold {
        CorrelationStrength::Moderate
    } else {
        CorrelationStrength::Weak
    }
}

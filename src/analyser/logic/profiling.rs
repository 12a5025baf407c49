//! Descriptive statistics for numeric columns.
//!
//! Location and spread come from polars aggregates over the non-missing
//! values: linear-interpolated quantiles, and standard deviation and
//! variance with one delta degree of freedom (sample form). Shape is
//! measured with the bias-corrected moment estimators:
//!
//! - skewness `G1 = sqrt(n(n-1)) / (n-2) * m3 / m2^1.5`, needs 3 values
//! - excess kurtosis `G2 = (n-1) / ((n-2)(n-3)) * ((n+1) m4 / m2^2 - 3(n-1))`,
//!   needs 4 values
//!
//! where `m_k` are the central moments. A constant column (min equal to max)
//! has a standard deviation, variance, skewness and kurtosis of zero.

use super::table;
use super::types::{ColumnKind, ColumnStatistics, Statistic, UndefinedReason};
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

const MIN_VALUES_FOR_SPREAD: usize = 2;
const MIN_VALUES_FOR_SKEW: usize = 3;
const MIN_VALUES_FOR_KURTOSIS: usize = 4;

/// Statistics for one named numeric column.
///
/// # Errors
///
/// `ColumnNotFound` if the column is absent, `NotNumeric` for a categorical
/// column, `EmptyColumn` when every value is missing.
pub fn compute_column_statistics(df: &DataFrame, column: &str) -> Result<ColumnStatistics> {
    let col = table::numeric_column(df, column)?;
    let values = table::present_values(col)?;
    log::debug!("Profiling '{column}' over {} values", values.len());
    statistics_from_values(column, values)
}

/// Statistics for every numeric column; categorical columns are skipped.
///
/// A numeric column with no values gets an undefined entry instead of
/// failing the whole call.
pub fn compute_all_columns_statistics(
    df: &DataFrame,
) -> Result<BTreeMap<String, Statistic<ColumnStatistics>>> {
    let mut all = BTreeMap::new();
    for col in df.get_columns() {
        if table::column_kind(col) != ColumnKind::Numeric {
            continue;
        }
        let name = col.name().to_string();
        let entry = match statistics_from_values(&name, table::present_values(col)?) {
            Ok(stats) => Statistic::Defined(stats),
            Err(AnalysisError::EmptyColumn { column }) => {
                log::warn!("Statistics for '{column}' are undefined: no non-missing values");
                Statistic::Undefined(UndefinedReason::NoValues)
            }
            Err(e) => return Err(e),
        };
        all.insert(name, entry);
    }
    Ok(all)
}

/// Statistics over already-extracted non-missing values.
pub(crate) fn statistics_from_values(column: &str, values: Vec<f64>) -> Result<ColumnStatistics> {
    let count = values.len();
    if count == 0 {
        return Err(AnalysisError::EmptyColumn {
            column: column.to_owned(),
        });
    }

    let ca = Float64Chunked::from_vec(column.into(), values);
    let empty = || AnalysisError::EmptyColumn {
        column: column.to_owned(),
    };

    let mean = ca.mean().ok_or_else(empty)?;
    let min = ca.min().ok_or_else(empty)?;
    let max = ca.max().ok_or_else(empty)?;
    let median = ca.median().ok_or_else(empty)?;
    let q1 = ca.quantile(0.25, QuantileMethod::Linear)?.ok_or_else(empty)?;
    let q3 = ca.quantile(0.75, QuantileMethod::Linear)?.ok_or_else(empty)?;

    let (std_dev, variance) = if count < MIN_VALUES_FOR_SPREAD {
        let reason = UndefinedReason::TooFewValues {
            required: MIN_VALUES_FOR_SPREAD,
            actual: count,
        };
        (
            Statistic::Undefined(reason.clone()),
            Statistic::Undefined(reason),
        )
    } else if min == max {
        (Statistic::Defined(0.0), Statistic::Defined(0.0))
    } else {
        (defined_or_no_values(ca.std(1)), defined_or_no_values(ca.var(1)))
    };

    let moments = CentralMoments::new(ca.into_no_null_iter(), mean, min == max);

    Ok(ColumnStatistics {
        count,
        mean,
        median,
        std_dev,
        min,
        max,
        q1,
        q3,
        range: max - min,
        variance,
        skewness: moments.skewness(),
        kurtosis: moments.excess_kurtosis(),
    })
}

fn defined_or_no_values(v: Option<f64>) -> Statistic<f64> {
    v.map_or(Statistic::Undefined(UndefinedReason::NoValues), Statistic::Defined)
}

/// Second to fourth central moments (population form, divided by n).
///
/// `constant` is decided from the values themselves: a rounded mean leaves a
/// tiny nonzero `m2` for columns such as `[3.3, 3.3, 3.3]`.
struct CentralMoments {
    n: usize,
    constant: bool,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl CentralMoments {
    fn new(values: impl Iterator<Item = f64>, mean: f64, constant: bool) -> Self {
        let (mut n, mut s2, mut s3, mut s4) = (0usize, 0.0, 0.0, 0.0);
        for v in values {
            let d = v - mean;
            let d2 = d * d;
            s2 += d2;
            s3 += d2 * d;
            s4 += d2 * d2;
            n += 1;
        }
        let nf = n.max(1) as f64;
        Self {
            n,
            constant,
            m2: s2 / nf,
            m3: s3 / nf,
            m4: s4 / nf,
        }
    }

    fn too_few(&self, required: usize) -> Option<Statistic<f64>> {
        (self.n < required).then_some(Statistic::Undefined(UndefinedReason::TooFewValues {
            required,
            actual: self.n,
        }))
    }

    fn skewness(&self) -> Statistic<f64> {
        if let Some(undefined) = self.too_few(MIN_VALUES_FOR_SKEW) {
            return undefined;
        }
        if self.constant {
            return Statistic::Defined(0.0);
        }
        let n = self.n as f64;
        let g1 = self.m3 / self.m2.powf(1.5);
        Statistic::Defined((n * (n - 1.0)).sqrt() / (n - 2.0) * g1)
    }

    fn excess_kurtosis(&self) -> Statistic<f64> {
        if let Some(undefined) = self.too_few(MIN_VALUES_FOR_KURTOSIS) {
            return undefined;
        }
        if self.constant {
            return Statistic::Defined(0.0);
        }
        let n = self.n as f64;
        let ratio = self.m4 / (self.m2 * self.m2);
        Statistic::Defined(
            (n - 1.0) / ((n - 2.0) * (n - 3.0)) * ((n + 1.0) * ratio - 3.0 * (n - 1.0)),
        )
    }
}

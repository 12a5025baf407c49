//! Read-only accessors over the loaded table.
//!
//! The table is a polars [`DataFrame`]. These helpers pin down the two
//! conventions every analysis shares: which columns count as numeric, and
//! what counts as missing (a null, or a floating `NaN` in a numeric column).

use super::types::ColumnKind;
use crate::error::{AnalysisError, Result};
use polars::prelude::*;

pub fn column_kind(col: &Column) -> ColumnKind {
    if col.dtype().is_primitive_numeric() {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

pub fn find_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.get_column_index(name)
        .and_then(|idx| df.get_columns().get(idx))
        .ok_or_else(|| AnalysisError::ColumnNotFound {
            name: name.to_owned(),
        })
}

pub fn numeric_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    let col = find_column(df, name)?;
    match column_kind(col) {
        ColumnKind::Numeric => Ok(col),
        ColumnKind::Categorical => Err(AnalysisError::NotNumeric {
            column: name.to_owned(),
        }),
    }
}

pub fn column_names_of_kind(df: &DataFrame, kind: ColumnKind) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| column_kind(c) == kind)
        .map(|c| c.name().to_string())
        .collect()
}

/// Row-aligned values of a numeric column, `None` where missing.
pub fn numeric_values(col: &Column) -> Result<Vec<Option<f64>>> {
    let series = col.as_materialized_series().cast(&DataType::Float64)?;
    let ca = series.f64()?;
    Ok(ca
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Non-missing values of a numeric column, in row order.
pub fn present_values(col: &Column) -> Result<Vec<f64>> {
    Ok(numeric_values(col)?.into_iter().flatten().collect())
}

/// Row-aligned values of any column rendered as text, `None` where missing.
pub fn text_values(col: &Column) -> Result<Vec<Option<String>>> {
    if column_kind(col) == ColumnKind::Numeric {
        return Ok(numeric_values(col)?
            .into_iter()
            .map(|v| v.map(|x| x.to_string()))
            .collect());
    }
    let series = col.as_materialized_series().cast(&DataType::String)?;
    let ca = series.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_owned)).collect())
}

pub fn missing_count(col: &Column) -> Result<usize> {
    match column_kind(col) {
        ColumnKind::Numeric => Ok(numeric_values(col)?.iter().filter(|v| v.is_none()).count()),
        ColumnKind::Categorical => Ok(col.null_count()),
    }
}

use super::table;
use super::types::{CategoryShare, ColumnInfo, ColumnKind, DatasetOverview};
use crate::error::Result;
use polars::prelude::*;
use std::collections::{BTreeMap, HashSet};

/// Shape, column types and missing-value counts of a table.
pub fn describe_dataset(df: &DataFrame) -> Result<DatasetOverview> {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            Ok(ColumnInfo {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                kind: table::column_kind(col),
                missing: table::missing_count(col)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DatasetOverview {
        row_count: df.height(),
        column_count: df.width(),
        numeric_columns: table::column_names_of_kind(df, ColumnKind::Numeric),
        categorical_columns: table::column_names_of_kind(df, ColumnKind::Categorical),
        estimated_size_bytes: df.estimated_size(),
        columns,
    })
}

/// Value counts of a column, most frequent first.
///
/// Missing values are not counted; percentages are relative to all rows.
pub fn category_breakdown(df: &DataFrame, column: &str) -> Result<Vec<CategoryShare>> {
    let col = table::find_column(df, column)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in table::text_values(col)?.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    let total = df.height().max(1) as f64;
    let mut shares: Vec<CategoryShare> = counts
        .into_iter()
        .map(|(value, count)| CategoryShare {
            value,
            count,
            percentage: count as f64 / total * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    Ok(shares)
}

/// Number of distinct non-missing values in a column.
pub fn distinct_count(col: &Column) -> Result<usize> {
    let mut seen = HashSet::new();
    for value in table::text_values(col)?.into_iter().flatten() {
        seen.insert(value);
    }
    Ok(seen.len())
}

use super::profiling::statistics_from_values;
use super::table;
use super::types::{CategoryGroupStatistics, Statistic, UndefinedReason};
use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Statistics of `numeric_column` within each value of `category_column`.
///
/// Rows whose category is missing are dropped. A group whose numeric values
/// are all missing gets an undefined entry; the other groups are unaffected.
///
/// # Errors
///
/// The errors of [`super::profiling::compute_column_statistics`] for the
/// numeric column, and `ColumnNotFound` when the category column is absent.
pub fn compute_category_group_statistics(
    df: &DataFrame,
    numeric_column: &str,
    category_column: &str,
) -> Result<CategoryGroupStatistics> {
    let numeric = table::numeric_column(df, numeric_column)?;
    let categories = table::find_column(df, category_column)?;

    let values = table::numeric_values(numeric)?;
    if values.iter().all(Option::is_none) {
        return Err(AnalysisError::EmptyColumn {
            column: numeric_column.to_owned(),
        });
    }

    let mut partitions: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (category, value) in table::text_values(categories)?.into_iter().zip(values) {
        let Some(category) = category else {
            continue;
        };
        let bucket = partitions.entry(category).or_default();
        if let Some(v) = value {
            bucket.push(v);
        }
    }

    let mut groups = BTreeMap::new();
    for (category, values) in partitions {
        let entry = match statistics_from_values(numeric_column, values) {
            Ok(stats) => Statistic::Defined(stats),
            Err(AnalysisError::EmptyColumn { .. }) => {
                log::warn!(
                    "Group '{category}' of '{category_column}' has no '{numeric_column}' values"
                );
                Statistic::Undefined(UndefinedReason::NoValues)
            }
            Err(e) => return Err(e),
        };
        groups.insert(category, entry);
    }

    Ok(CategoryGroupStatistics {
        numeric_column: numeric_column.to_owned(),
        category_column: category_column.to_owned(),
        groups,
    })
}

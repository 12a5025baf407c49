use crate::error::{AnalysisError, Result, ResultExt as _};
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;

const INFER_SCHEMA_ROWS: usize = 10_000;

/// Loads a CSV file with a header row into a table.
///
/// Empty cells become nulls, which every analysis treats as missing.
pub fn load_table(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    if ext != "csv" {
        return Err(AnalysisError::DataProcessing(format!(
            "Unsupported file extension: '{ext}' (expected csv)"
        )));
    }
    if !path.exists() {
        return Err(AnalysisError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let df = LazyCsvReader::new(path)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .finish()?
        .collect()
        .with_context(|| format!("Failed to read CSV {}", path.display()))?;

    log::info!(
        "Loaded {} ({} rows x {} columns)",
        path.display(),
        df.height(),
        df.width()
    );

    check_table(&df)?;
    Ok(df)
}

/// Verifies the table invariants: unique column names, equal column lengths.
pub fn check_table(df: &DataFrame) -> Result<()> {
    let mut seen = HashSet::new();
    let height = df.height();
    for col in df.get_columns() {
        if !seen.insert(col.name().as_str()) {
            return Err(AnalysisError::DataProcessing(format!(
                "Duplicate column name: '{}'",
                col.name()
            )));
        }
        if col.len() != height {
            return Err(AnalysisError::DataProcessing(format!(
                "Column '{}' has {} rows, expected {height}",
                col.name(),
                col.len()
            )));
        }
    }
    Ok(())
}

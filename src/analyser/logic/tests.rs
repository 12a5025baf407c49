mod charts;
mod correlation;

use polars::prelude::*;

/// The two-column employee table used across the tests.
fn employees() -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::from(Series::new("Age".into(), vec![30i64, 32, 34, 36, 38])),
        Column::from(Series::new(
            "Dept".into(),
            vec!["Eng", "Eng", "Sales", "Sales", "Sales"],
        )),
    ])
}

fn frame(columns: Vec<Series>) -> PolarsResult<DataFrame> {
    DataFrame::new(columns.into_iter().map(Column::from).collect())
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

use super::{close, employees, frame};
use crate::analyser::logic::charts::{bar_chart, heatmap, histogram, scatter};
use crate::error::AnalysisError;
use anyhow::Result;
use polars::prelude::*;

#[test]
fn test_histogram_counts() -> Result<()> {
    let df = frame(vec![Series::new(
        "x".into(),
        vec![Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(10.0)],
    )])?;
    let hist = histogram(&df, "x", 3)?;

    let counts: Vec<usize> = hist.bins.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![3, 1, 1]);
    assert!(hist.bins.first().is_some_and(|b| close(b.lower, 1.0)));
    assert!(hist.bins.last().is_some_and(|b| close(b.upper, 10.0)));
    assert!(close(hist.mean, 4.0));
    assert!(close(hist.median, 3.0));
    Ok(())
}

#[test]
fn test_histogram_of_constant_column() -> Result<()> {
    let df = frame(vec![Series::new("x".into(), vec![7.0, 7.0, 7.0])])?;
    let hist = histogram(&df, "x", 20)?;

    assert_eq!(hist.bins.len(), 1);
    let bin = hist.bins.first().expect("one bin");
    assert_eq!(bin.count, 3);
    assert!(close(bin.lower, 6.5) && close(bin.upper, 7.5));
    Ok(())
}

#[test]
fn test_histogram_rejects_zero_bins() -> Result<()> {
    let df = employees()?;
    let err = histogram(&df, "Age", 0).expect_err("zero bins");
    assert!(matches!(err, AnalysisError::Config(_)), "got {err}");

    let err = histogram(&df, "Dept", 5).expect_err("text column");
    assert!(matches!(err, AnalysisError::NotNumeric { .. }), "got {err}");
    Ok(())
}

#[test]
fn test_scatter_groups_by_colour() -> Result<()> {
    let df = frame(vec![
        Series::new("x".into(), vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)]),
        Series::new("y".into(), vec![2.0, 4.0, 6.0, 8.0, 10.0]),
        Series::new(
            "team".into(),
            vec![Some("b"), Some("a"), None, Some("a"), Some("b")],
        ),
    ])?;
    let plot = scatter(&df, "x", "y", Some("team"))?;

    let labels: Vec<Option<&str>> = plot.series.iter().map(|s| s.label.as_deref()).collect();
    assert_eq!(labels, vec![Some("b"), Some("a"), Some("(missing)")]);
    let sizes: Vec<usize> = plot.series.iter().map(|s| s.points.len()).collect();
    assert_eq!(sizes, vec![2, 1, 1]);
    assert!(plot.correlation.value().is_some_and(|r| close(r, 1.0)));

    let plain = scatter(&df, "x", "y", None)?;
    assert_eq!(plain.series.len(), 1);
    assert_eq!(plain.series.first().map(|s| s.points.len()), Some(4));
    Ok(())
}

#[test]
fn test_bar_chart_and_heatmap() -> Result<()> {
    let df = employees()?;

    let bars = bar_chart(&df, "Dept")?;
    let values: Vec<(&str, usize)> = bars.bars.iter().map(|b| (b.value.as_str(), b.count)).collect();
    assert_eq!(values, vec![("Sales", 3), ("Eng", 2)]);
    assert!(bars.bars.first().is_some_and(|b| close(b.percentage, 60.0)));

    let map = heatmap(&df)?;
    assert_eq!(map.labels, vec!["Age"]);
    assert_eq!(map.cells, vec![vec![Some(1.0)]]);
    Ok(())
}

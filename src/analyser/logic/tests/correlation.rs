use super::{close, frame};
use crate::analyser::logic::{
    CorrelationStrength, Statistic, UndefinedReason, compute_correlation_matrix,
    pearson_correlation, rank_correlations,
};
use crate::config::InsightConfig;
use crate::error::AnalysisError;
use anyhow::Result;
use polars::prelude::*;

fn sample() -> PolarsResult<DataFrame> {
    frame(vec![
        Series::new("up".into(), vec![1.0, 2.0, 3.0, 4.0]),
        Series::new("down".into(), vec![4.0, 3.0, 2.0, 1.0]),
        Series::new("flat".into(), vec![5.0, 5.0, 5.0, 5.0]),
        Series::new("label".into(), vec!["a", "b", "c", "d"]),
    ])
}

#[test]
fn test_perfect_anti_correlation() -> Result<()> {
    let df = sample()?;
    let r = pearson_correlation(&df, "up", "down")?;
    assert!(close(r, -1.0), "r was {r}");
    Ok(())
}

#[test]
fn test_matrix_shape_and_symmetry() -> Result<()> {
    let df = sample()?;
    let matrix = compute_correlation_matrix(&df)?;

    assert_eq!(matrix.columns, vec!["up", "down", "flat"]);
    for (i, row) in matrix.data.iter().enumerate() {
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(i), Some(&Statistic::Defined(1.0)), "diagonal {i}");
        for (j, cell) in row.iter().enumerate() {
            let mirrored = matrix.data.get(j).and_then(|r| r.get(i));
            assert_eq!(Some(cell), mirrored, "cell ({i}, {j}) not symmetric");
        }
    }
    Ok(())
}

#[test]
fn test_constant_column_is_undefined() -> Result<()> {
    let df = sample()?;
    let matrix = compute_correlation_matrix(&df)?;
    assert_eq!(
        matrix.get("up", "flat"),
        Some(&Statistic::Undefined(UndefinedReason::ZeroVariance))
    );
    assert_eq!(matrix.get("flat", "flat"), Some(&Statistic::Defined(1.0)));

    let err = pearson_correlation(&df, "flat", "down").expect_err("zero variance");
    assert!(
        matches!(
            err,
            AnalysisError::InsufficientData {
                reason: UndefinedReason::ZeroVariance,
                ..
            }
        ),
        "got {err}"
    );
    Ok(())
}

#[test]
fn test_constant_column_with_inexact_mean_is_undefined() -> Result<()> {
    let df = frame(vec![
        Series::new("c".into(), vec![3.3, 3.3, 3.3]),
        Series::new("y".into(), vec![0.1, 0.2, 0.7]),
    ])?;
    let matrix = compute_correlation_matrix(&df)?;
    assert_eq!(
        matrix.get("c", "y"),
        Some(&Statistic::Undefined(UndefinedReason::ZeroVariance))
    );

    let err = pearson_correlation(&df, "y", "c").expect_err("c is constant");
    assert!(
        matches!(
            err,
            AnalysisError::InsufficientData {
                reason: UndefinedReason::ZeroVariance,
                ..
            }
        ),
        "got {err}"
    );
    Ok(())
}

#[test]
fn test_constant_over_joint_rows_is_undefined() -> Result<()> {
    // x varies overall but is constant on the rows where y is present.
    let df = frame(vec![
        Series::new("x".into(), vec![Some(2.0), Some(2.0), Some(9.0)]),
        Series::new("y".into(), vec![Some(1.0), Some(5.0), None]),
    ])?;
    let matrix = compute_correlation_matrix(&df)?;
    assert_eq!(
        matrix.get("x", "y"),
        Some(&Statistic::Undefined(UndefinedReason::ZeroVariance))
    );
    Ok(())
}

#[test]
fn test_pairwise_complete_rows() -> Result<()> {
    // Row 2 would break the linear relation but is missing on one side.
    let df = frame(vec![
        Series::new("x".into(), vec![Some(1.0), Some(2.0), Some(100.0), Some(4.0)]),
        Series::new("y".into(), vec![Some(2.0), Some(4.0), None, Some(8.0)]),
    ])?;
    let r = pearson_correlation(&df, "x", "y")?;
    assert!(close(r, 1.0), "r was {r}");
    Ok(())
}

#[test]
fn test_too_few_joint_rows() -> Result<()> {
    let df = frame(vec![
        Series::new("x".into(), vec![Some(1.0), None, Some(3.0)]),
        Series::new("y".into(), vec![None, Some(2.0), Some(9.0)]),
    ])?;
    let matrix = compute_correlation_matrix(&df)?;
    assert_eq!(
        matrix.get("x", "y"),
        Some(&Statistic::Undefined(UndefinedReason::TooFewValues {
            required: 2,
            actual: 1
        }))
    );
    assert!(rank_correlations(&matrix, &InsightConfig::default()).is_empty());
    Ok(())
}

#[test]
fn test_single_numeric_column() -> Result<()> {
    let df = frame(vec![
        Series::new("x".into(), vec![1.0, 2.0]),
        Series::new("t".into(), vec!["a", "b"]),
    ])?;
    let matrix = compute_correlation_matrix(&df)?;
    assert_eq!(matrix.columns, vec!["x"]);
    assert_eq!(matrix.data, vec![vec![Statistic::Defined(1.0)]]);
    assert_eq!(matrix.pairs().count(), 0);
    Ok(())
}

#[test]
fn test_non_numeric_pair_is_rejected() -> Result<()> {
    let df = sample()?;
    let err = pearson_correlation(&df, "up", "label").expect_err("label is text");
    assert!(matches!(err, AnalysisError::NotNumeric { .. }), "got {err}");
    Ok(())
}

#[test]
fn test_ranking_orders_by_magnitude_then_name() -> Result<()> {
    let df = frame(vec![
        Series::new("a".into(), vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        Series::new("b".into(), vec![5.0, 4.0, 3.0, 2.0, 1.0]),
        Series::new("c".into(), vec![2.0, 4.0, 6.0, 8.0, 10.0]),
        Series::new("d".into(), vec![1.0, 3.0, 2.0, 5.0, 4.0]),
    ])?;
    let matrix = compute_correlation_matrix(&df)?;
    let ranked = rank_correlations(&matrix, &InsightConfig::default());

    // Six pairs; the three perfect ones come first in name order.
    assert_eq!(ranked.len(), 6);
    let names: Vec<(&str, &str)> = ranked
        .iter()
        .map(|p| (p.left.as_str(), p.right.as_str()))
        .collect();
    assert_eq!(names.get(..3), Some(&[("a", "b"), ("a", "c"), ("b", "c")][..]));
    for pair in ranked.get(..3).unwrap_or_default() {
        assert_eq!(pair.strength, CorrelationStrength::Strong);
    }
    for window in ranked.windows(2) {
        if let [first, second] = window {
            assert!(first.coefficient.abs() >= second.coefficient.abs());
        }
    }
    Ok(())
}

#[test]
fn test_strength_bands_follow_config() -> Result<()> {
    // r(x, y) = 0.6 for these values.
    let df = frame(vec![
        Series::new("x".into(), vec![1.0, 2.0, 3.0, 4.0, 5.0]),
        Series::new("y".into(), vec![3.0, 1.0, 2.0, 5.0, 4.0]),
    ])?;
    let matrix = compute_correlation_matrix(&df)?;

    let default = rank_correlations(&matrix, &InsightConfig::default());
    assert_eq!(
        default.first().map(|p| p.strength),
        Some(CorrelationStrength::Moderate)
    );

    let strict = InsightConfig {
        moderate_correlation_threshold: 0.65,
        ..InsightConfig::default()
    };
    let strict = rank_correlations(&matrix, &strict);
    assert_eq!(
        strict.first().map(|p| p.strength),
        Some(CorrelationStrength::Weak)
    );
    Ok(())
}

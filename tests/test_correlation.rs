//! Tests for the correlation matrix

use churnscope::pipeline::{
    correlation_matrix, correlation_matrix_fast, correlation_matrix_pairwise, ChurnDataset,
    CleaningOptions,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

fn known_frame() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0], // b = 2a
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0], // reversed a
        "label" => ["x", "y", "x", "y", "x", "y", "x", "y", "x", "y"],
    }
    .unwrap()
}

#[test]
fn test_known_coefficients() {
    let matrix = correlation_matrix(&known_frame()).unwrap();

    assert_eq!(matrix.columns, vec!["a", "b", "c"], "text columns are excluded");
    common::assert_close(matrix.between("a", "b").unwrap(), 1.0, "a~b");
    common::assert_close(matrix.between("a", "c").unwrap(), -1.0, "a~c");
    assert!(matrix.between("a", "label").is_none());
}

#[test]
fn test_matrix_is_symmetric_with_unit_diagonal() {
    let dataset =
        ChurnDataset::from_frame(&common::create_telco_dataframe(), &CleaningOptions::default())
            .unwrap();
    let matrix = correlation_matrix(dataset.frame()).unwrap();

    assert_eq!(
        matrix.columns,
        vec!["SeniorCitizen", "tenure", "MonthlyCharges", "TotalCharges", "Churn"]
    );
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), 1.0);
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            assert!((-1.0..=1.0).contains(&matrix.get(i, j)));
        }
    }
}

#[test]
fn test_constant_column_is_undefined() {
    let df = df! {
        "a" => [1.0f64, 2.0, 3.0],
        "flat" => [5.0f64, 5.0, 5.0],
    }
    .unwrap();

    let matrix = correlation_matrix(&df).unwrap();
    assert!(matrix.between("a", "flat").unwrap().is_nan());
    assert!(matrix.between("flat", "flat").unwrap().is_nan());
    assert_eq!(matrix.between("a", "a").unwrap(), 1.0);
}

#[test]
fn test_pairwise_complete_observations() {
    let df = df! {
        "x" => [Some(1.0f64), Some(2.0), None, Some(4.0), Some(5.0)],
        "y" => [Some(2.0f64), Some(4.0), Some(100.0), Some(8.0), Some(10.0)],
    }
    .unwrap();

    // The null row is skipped, so the outlier in y never counts
    let matrix = correlation_matrix(&df).unwrap();
    common::assert_close(matrix.between("x", "y").unwrap(), 1.0, "x~y");
}

#[test]
fn test_empty_table_gives_nan() {
    let df = known_frame().head(Some(0));
    let matrix = correlation_matrix(&df).unwrap();

    assert_eq!(matrix.len(), 3);
    assert!(matrix.values.iter().flatten().all(|v| v.is_nan()));
}

#[test]
fn test_fast_method_matches_pairwise() {
    let df = common::create_large_telco_dataframe(500);
    let dataset = ChurnDataset::from_frame(&df, &CleaningOptions::default()).unwrap();

    let pairwise = correlation_matrix_pairwise(dataset.frame()).unwrap();
    let fast = correlation_matrix_fast(dataset.frame()).unwrap();

    assert_eq!(pairwise.columns, fast.columns);
    for i in 0..pairwise.len() {
        for j in 0..pairwise.len() {
            let (p, f) = (pairwise.get(i, j), fast.get(i, j));
            assert!(
                (p - f).abs() < 1e-9 || (p.is_nan() && f.is_nan()),
                "mismatch at ({}, {}): {} vs {}",
                i,
                j,
                p,
                f
            );
        }
    }
}

#[test]
fn test_constant_column_is_undefined_on_wide_tables() {
    // Enough columns for the matrix method; 0.1 has no exact binary form
    let rows = 20;
    let mut columns: Vec<Column> = (0..15)
        .map(|k| {
            let values: Vec<f64> = (0..rows)
                .map(|i| ((i * (k + 2) + k * k) % 17) as f64 + 0.25 * k as f64)
                .collect();
            Column::new(format!("c{}", k).into(), values)
        })
        .collect();
    columns.push(Column::new("flat".into(), vec![0.1f64; rows]));
    let df = DataFrame::new(columns).unwrap();

    let auto = correlation_matrix(&df).unwrap();
    let fast = correlation_matrix_fast(&df).unwrap();
    let pairwise = correlation_matrix_pairwise(&df).unwrap();

    for matrix in [&auto, &fast, &pairwise] {
        assert!(matrix.between("flat", "flat").unwrap().is_nan());
        for k in 0..15 {
            assert!(matrix.between("flat", &format!("c{}", k)).unwrap().is_nan());
        }
        assert_eq!(matrix.between("c0", "c0").unwrap(), 1.0);
    }

    for i in 0..pairwise.len() {
        for j in 0..pairwise.len() {
            let (p, f) = (pairwise.get(i, j), auto.get(i, j));
            assert!(
                (p - f).abs() < 1e-9 || (p.is_nan() && f.is_nan()),
                "mismatch at ({}, {}): {} vs {}",
                i,
                j,
                p,
                f
            );
        }
    }
}

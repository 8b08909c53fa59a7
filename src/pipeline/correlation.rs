//! Pearson correlation matrix over the numeric columns

use anyhow::Result;
use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

/// Threshold for auto-selecting matrix vs pairwise correlation computation.
/// Matrix multiplication is more efficient when there are many columns.
const MATRIX_METHOD_COLUMN_THRESHOLD: usize = 15;

/// Square correlation matrix, rows and columns in `columns` order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    fn undefined(columns: Vec<String>) -> Self {
        let n = columns.len();
        Self {
            columns,
            values: vec![vec![f64::NAN; n]; n],
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Look up a coefficient by column names
    pub fn between(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Numeric columns cast to Float64, in table order
fn numeric_float_columns(df: &DataFrame) -> Vec<(String, Column)> {
    df.get_columns()
        .iter()
        .filter(|col| col.dtype().is_primitive_numeric())
        .filter_map(|col| {
            col.cast(&DataType::Float64)
                .ok()
                .map(|cast| (col.name().to_string(), cast))
        })
        .collect()
}

/// Correlation matrix of every numeric column, picking the faster method.
///
/// The matrix method needs complete columns, so any null falls back to the
/// pairwise method, which uses pairwise-complete observations.
pub fn correlation_matrix(df: &DataFrame) -> Result<CorrelationMatrix> {
    let float_columns = numeric_float_columns(df);
    let has_nulls = float_columns.iter().any(|(_, col)| col.null_count() > 0);

    if !has_nulls && float_columns.len() >= MATRIX_METHOD_COLUMN_THRESHOLD {
        correlation_matrix_fast(df)
    } else {
        correlation_matrix_pairwise(df)
    }
}

/// Pairwise Pearson correlation, pairs computed in parallel via Rayon
pub fn correlation_matrix_pairwise(df: &DataFrame) -> Result<CorrelationMatrix> {
    let float_columns = numeric_float_columns(df);
    let n = float_columns.len();
    let names: Vec<String> = float_columns.iter().map(|(name, _)| name.clone()).collect();

    // Generate all pairs (indices for upper triangle, diagonal included)
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| (i..n).map(move |j| (i, j)))
        .collect();

    let coefficients: Vec<((usize, usize), f64)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let corr = compute_pearson_correlation(&float_columns[i].1, &float_columns[j].1);
            let value = match corr {
                Some(_) if i == j => 1.0,
                Some(c) => c.clamp(-1.0, 1.0),
                None => f64::NAN,
            };
            ((i, j), value)
        })
        .collect();

    let mut matrix = CorrelationMatrix::undefined(names);
    for ((i, j), value) in coefficients {
        matrix.values[i][j] = value;
        matrix.values[j][i] = value;
    }

    Ok(matrix)
}

/// Pearson correlation using Welford's single-pass algorithm.
///
/// Only rows where both values are present count. Returns `None` with fewer
/// than two such rows or when either side has zero variance.
fn compute_pearson_correlation(s1: &Column, s2: &Column) -> Option<f64> {
    let ca1 = s1.f64().ok()?;
    let ca2 = s2.f64().ok()?;

    let n = ca1.len();
    if n == 0 || n != ca2.len() {
        return None;
    }

    let mut count = 0.0;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in ca1.iter().zip(ca2.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            if x.is_nan() || y.is_nan() {
                continue;
            }
            count += 1.0;
            let dx = x - mean_x;
            let dy = y - mean_y;
            mean_x += dx / count;
            mean_y += dy / count;
            var_x += dx * (x - mean_x);
            var_y += dy * (y - mean_y);
            cov_xy += dx * (y - mean_y);
        }
    }

    if count < 2.0 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    Some(cov_xy / (var_x.sqrt() * var_y.sqrt()))
}

/// Compute correlation matrix using matrix operations (much faster for many columns).
///
/// Algorithm:
/// 1. Standardize every column: Z = (X - mean) / (std * sqrt(n))
/// 2. Compute correlation matrix: R = Z^T * Z
///
/// Columns must be null-free; constant columns get NaN rows.
pub fn correlation_matrix_fast(df: &DataFrame) -> Result<CorrelationMatrix> {
    let float_columns = numeric_float_columns(df);
    let names: Vec<String> = float_columns.iter().map(|(name, _)| name.clone()).collect();
    anyhow::ensure!(
        float_columns.iter().all(|(_, col)| col.null_count() == 0),
        "Matrix correlation requires columns without nulls"
    );

    let n_rows = df.height();
    if n_rows < 2 || float_columns.is_empty() {
        return Ok(CorrelationMatrix::undefined(names));
    }

    // Standardize columns in parallel; None marks a constant column
    let standardized: Vec<Option<Vec<f64>>> = float_columns
        .par_iter()
        .map(|(_, col)| {
            let ca = col.f64().ok()?;
            let values: Vec<f64> = ca.into_no_null_iter().collect();
            // The mean of a constant column can differ from its value by
            // rounding, leaving a tiny nonzero spread
            let (min, max) = values
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                });
            if min == max {
                return None;
            }
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
            if ss <= 0.0 || ss.is_nan() {
                return None;
            }
            let scale = ss.sqrt();
            Some(values.iter().map(|x| (x - mean) / scale).collect())
        })
        .collect();

    let valid: Vec<(usize, &Vec<f64>)> = standardized
        .iter()
        .enumerate()
        .filter_map(|(i, col)| col.as_ref().map(|v| (i, v)))
        .collect();

    let mut matrix = CorrelationMatrix::undefined(names);
    if valid.is_empty() {
        return Ok(matrix);
    }

    // Build the standardized data matrix Z (n_rows x n_valid)
    let mut z = Mat::<f64>::zeros(n_rows, valid.len());
    for (col_idx, (_, col_data)) in valid.iter().enumerate() {
        for (row_idx, &val) in col_data.iter().enumerate() {
            z[(row_idx, col_idx)] = val;
        }
    }

    let corr = z.transpose() * &z;

    for (a, (i, _)) in valid.iter().enumerate() {
        for (b, (j, _)) in valid.iter().enumerate() {
            matrix.values[*i][*j] = if i == j {
                1.0
            } else {
                corr[(a, b)].clamp(-1.0, 1.0)
            };
        }
    }

    Ok(matrix)
}

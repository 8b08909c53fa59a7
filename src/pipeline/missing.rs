//! Missing value analysis, numeric coercion and median imputation

use anyhow::Result;
use polars::prelude::*;

/// Outcome of filling a column's nulls with its median
#[derive(Debug, Clone)]
pub struct Imputation {
    /// The filled column (same name as the input)
    pub column: Column,
    /// Median of the non-null values, `None` if there were none
    pub median: Option<f64>,
    /// Number of cells that were replaced
    pub imputed: usize,
}

/// Analyze missing values in the dataset.
///
/// Returns `(column, null_ratio)` for every column, sorted by ratio descending.
pub fn analyze_missing_values(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    // Handle empty DataFrame
    if df.height() == 0 {
        return Ok(Vec::new());
    }

    let rows = df.height() as f64;
    let mut missing_ratios: Vec<(String, f64)> = df
        .get_columns()
        .iter()
        .map(|col| (col.name().to_string(), col.null_count() as f64 / rows))
        .collect();

    missing_ratios.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(missing_ratios)
}

/// Coerce a column to `Float64`.
///
/// String cells are trimmed and parsed; anything that does not parse becomes
/// null. NaN is treated as missing. Numeric columns are cast directly.
pub fn coerce_to_numeric(column: &Column) -> Result<Column> {
    let name = column.name().clone();

    let values: Vec<Option<f64>> = match column.dtype() {
        DataType::String => column
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_number))
            .collect(),
        dtype if dtype.is_primitive_numeric() => {
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect()
        }
        _ => {
            let cast = column.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.and_then(parse_number))
                .collect()
        }
    };

    Ok(Column::new(name, values))
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|x| !x.is_nan())
}

/// Median of the non-null values of a numeric column
pub fn column_median(column: &Column) -> Result<Option<f64>> {
    let cast = column.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = cast
        .f64()?
        .into_iter()
        .flatten()
        .filter(|x| !x.is_nan())
        .collect();

    Ok(median(&mut values))
}

/// Median of a slice, reordering it in place. Even counts average the middle pair.
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Replace nulls in a numeric column with the median of its non-null values.
///
/// A column without nulls comes back unchanged. If every value is null there
/// is no median and the nulls are left in place.
pub fn impute_with_median(column: &Column) -> Result<Imputation> {
    let median = column_median(column)?;
    let cast = column.cast(&DataType::Float64)?;
    let ca = cast.f64()?;

    let mut imputed = 0;
    let values: Vec<Option<f64>> = ca
        .into_iter()
        .map(|v| match (v, median) {
            (Some(x), _) => Some(x),
            (None, Some(m)) => {
                imputed += 1;
                Some(m)
            }
            (None, None) => None,
        })
        .collect();

    Ok(Imputation {
        column: Column::new(column.name().clone(), values),
        median,
        imputed,
    })
}

//! Monthly-charge distribution split by churn

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::aggregate::churn_values;
use super::schema::MONTHLY_CHARGES;

/// Bin count used by the dashboard
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// One equal-width bin, `[lower, upper)` except the last which is closed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub churned: usize,
    pub retained: usize,
    /// Rows whose churn label is unknown
    pub unlabeled: usize,
}

impl HistogramBin {
    pub fn total(&self) -> usize {
        self.churned + self.retained + self.unlabeled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargeHistogram {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

impl ChargeHistogram {
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Largest per-series count, for scaling bar charts
    pub fn max_count(&self) -> usize {
        self.bins
            .iter()
            .flat_map(|b| [b.churned, b.retained, b.unlabeled])
            .max()
            .unwrap_or(0)
    }
}

/// Histogram of `MonthlyCharges` with `bins` equal-width bins over its range
pub fn charge_histogram(df: &DataFrame, bins: usize) -> Result<ChargeHistogram> {
    histogram_by_churn(df, MONTHLY_CHARGES, bins)
}

/// Histogram of any numeric column, each bin split by churn label.
///
/// An empty column gives no bins. When every value is equal the data falls
/// into a single unit-width bin.
pub fn histogram_by_churn(df: &DataFrame, column: &str, bins: usize) -> Result<ChargeHistogram> {
    anyhow::ensure!(bins > 0, "Histogram needs at least one bin");

    let values = df
        .column(column)
        .with_context(|| format!("Column '{}' not found", column))?
        .cast(&DataType::Float64)?;
    let churn = churn_values(df)?;

    let points: Vec<(f64, Option<i32>)> = values
        .f64()?
        .into_iter()
        .zip(churn)
        .filter_map(|(v, c)| v.filter(|x| x.is_finite()).map(|x| (x, c)))
        .collect();

    if points.is_empty() {
        return Ok(ChargeHistogram {
            column: column.to_string(),
            bins: Vec::new(),
        });
    }

    let min = points.iter().map(|(x, _)| *x).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);
    let (bin_count, width) = if max > min {
        (bins, (max - min) / bins as f64)
    } else {
        (1, 1.0)
    };

    let mut out: Vec<HistogramBin> = (0..bin_count)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: min + (i + 1) as f64 * width,
            churned: 0,
            retained: 0,
            unlabeled: 0,
        })
        .collect();
    if let Some(last) = out.last_mut() {
        last.upper = last.upper.max(max);
    }

    for (x, label) in points {
        let idx = (((x - min) / width).floor() as usize).min(bin_count - 1);
        let bin = &mut out[idx];
        match label {
            Some(1) => bin.churned += 1,
            Some(_) => bin.retained += 1,
            None => bin.unlabeled += 1,
        }
    }

    Ok(ChargeHistogram {
        column: column.to_string(),
        bins: out,
    })
}

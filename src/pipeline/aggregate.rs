//! Group-by churn rates and headline metrics

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::schema::{CHURN, MONTHLY_CHARGES, TENURE};
use super::target::column_to_string_vec;

/// Churn rate of one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRate {
    pub category: String,
    /// Mean of the churn indicator over labelled rows; NaN if there are none
    pub churn_rate: f64,
    pub customers: usize,
    pub churned: usize,
}

/// Headline numbers shown above the charts
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub customers: usize,
    pub churn_rate: f64,
    pub avg_tenure: f64,
    pub avg_monthly_charge: f64,
}

impl KeyMetrics {
    pub fn churn_rate_label(&self) -> String {
        format!("{:.2}%", self.churn_rate * 100.0)
    }

    pub fn avg_tenure_label(&self) -> String {
        format!("{:.1} months", self.avg_tenure)
    }

    pub fn avg_monthly_charge_label(&self) -> String {
        format!("${:.2}", self.avg_monthly_charge)
    }
}

const CUSTOMERS: &str = "customers";
const CHURN_RATE: &str = "churn_rate";
const CHURNED: &str = "churned";

/// Mean churn per distinct value of `group_column`.
///
/// Rows with a null key are skipped and null churn values are ignored in the
/// mean. Groups come out sorted by key: numeric keys by value, text keys
/// lexicographically.
pub fn churn_rate_by(df: &DataFrame, group_column: &str) -> Result<Vec<GroupRate>> {
    df.column(group_column)
        .with_context(|| format!("Group column '{}' not found", group_column))?;
    df.column(CHURN)
        .with_context(|| format!("Column '{}' not found", CHURN))?;

    let churn = col(CHURN).cast(DataType::Float64);
    let grouped = df
        .clone()
        .lazy()
        .filter(col(group_column).is_not_null())
        .group_by([col(group_column)])
        .agg([
            len().alias(CUSTOMERS),
            churn.clone().mean().alias(CHURN_RATE),
            churn.sum().alias(CHURNED),
        ])
        .sort_by_exprs([col(group_column)], SortMultipleOptions::default())
        .collect()
        .with_context(|| format!("Failed to group churn by '{}'", group_column))?;

    let categories = column_to_string_vec(grouped.column(group_column)?)?;
    let customers = grouped.column(CUSTOMERS)?.cast(&DataType::UInt64)?;
    let rates = grouped.column(CHURN_RATE)?.cast(&DataType::Float64)?;
    let churned = grouped.column(CHURNED)?.cast(&DataType::Float64)?;

    Ok(categories
        .into_iter()
        .zip(customers.u64()?.into_iter())
        .zip(rates.f64()?.into_iter())
        .zip(churned.f64()?.into_iter())
        .filter_map(|(((category, customers), rate), churned)| {
            Some(GroupRate {
                category: category?,
                churn_rate: rate.unwrap_or(f64::NAN),
                customers: customers.unwrap_or(0) as usize,
                churned: churned.unwrap_or(0.0).round() as usize,
            })
        })
        .collect())
}

/// Churn rate, mean tenure and mean monthly charge of a table.
///
/// Means skip nulls; an empty table gives NaN.
pub fn key_metrics(df: &DataFrame) -> Result<KeyMetrics> {
    let means = df
        .clone()
        .lazy()
        .select([
            col(CHURN).cast(DataType::Float64).mean().alias(CHURN),
            col(TENURE).cast(DataType::Float64).mean().alias(TENURE),
            col(MONTHLY_CHARGES)
                .cast(DataType::Float64)
                .mean()
                .alias(MONTHLY_CHARGES),
        ])
        .collect()
        .context("Failed to compute key metrics")?;

    let first = |name: &str| -> Result<f64> {
        Ok(means.column(name)?.f64()?.get(0).unwrap_or(f64::NAN))
    };

    Ok(KeyMetrics {
        customers: df.height(),
        churn_rate: first(CHURN)?,
        avg_tenure: first(TENURE)?,
        avg_monthly_charge: first(MONTHLY_CHARGES)?,
    })
}

pub(crate) fn churn_values(df: &DataFrame) -> Result<Vec<Option<i32>>> {
    let churn = df
        .column(CHURN)
        .with_context(|| format!("Column '{}' not found", CHURN))?
        .cast(&DataType::Int32)?;
    Ok(churn.i32()?.into_iter().collect())
}

//! Cleaning pass applied once after loading
//!
//! 1. `TotalCharges` is coerced to numeric and its gaps filled with the median
//! 2. `Churn` is encoded to 0/1
//! 3. `customerID` is dropped if present

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::missing::{analyze_missing_values, coerce_to_numeric, impute_with_median};
use super::schema::{CHURN, CUSTOMER_ID, TOTAL_CHARGES};
use super::target::{encode_target, TargetMapping, UnmappedLabelPolicy};

/// Options controlling the cleaning pass
#[derive(Debug, Clone, Default)]
pub struct CleaningOptions {
    pub mapping: TargetMapping,
    pub unmapped_policy: UnmappedLabelPolicy,
}

/// What the cleaning pass changed
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleaningReport {
    /// Null ratio per column of the raw table, only columns with gaps
    pub raw_missing: Vec<(String, f64)>,
    /// `TotalCharges` cells that failed coercion or were empty
    pub total_charges_imputed: usize,
    /// Median used to fill them
    pub total_charges_median: Option<f64>,
    pub churn_events: usize,
    pub churn_non_events: usize,
    pub churn_unmapped: usize,
    /// Rows removed because of unmapped churn labels
    pub dropped_rows: usize,
    pub identifier_dropped: bool,
}

/// Run the cleaning pass and return the clean table with a report
pub fn clean_dataset(df: &DataFrame, options: &CleaningOptions) -> Result<(DataFrame, CleaningReport)> {
    let raw_missing: Vec<(String, f64)> = analyze_missing_values(df)?
        .into_iter()
        .filter(|(_, ratio)| *ratio > 0.0)
        .collect();

    let mut frame = df.clone();

    let charges = frame
        .column(TOTAL_CHARGES)
        .with_context(|| format!("Column '{}' not found", TOTAL_CHARGES))?;
    let coerced = coerce_to_numeric(charges)?;
    let imputation = impute_with_median(&coerced)?;
    if imputation.median.is_none() && frame.height() > 0 {
        log::warn!(
            "'{}' has no numeric values; its gaps cannot be filled",
            TOTAL_CHARGES
        );
    } else if imputation.imputed > 0 {
        log::info!(
            "filled {} missing '{}' value(s) with median {:.2}",
            imputation.imputed,
            TOTAL_CHARGES,
            imputation.median.unwrap_or(f64::NAN)
        );
    }
    frame.with_column(imputation.column)?;

    let encoding = encode_target(&frame, CHURN, &options.mapping, options.unmapped_policy)?;
    let mut frame = encoding.frame;

    let identifier_dropped = frame
        .get_column_names()
        .iter()
        .any(|name| name.as_str() == CUSTOMER_ID);
    if identifier_dropped {
        frame = frame.drop(CUSTOMER_ID)?;
    }

    let report = CleaningReport {
        raw_missing,
        total_charges_imputed: imputation.imputed,
        total_charges_median: imputation.median,
        churn_events: encoding.events,
        churn_non_events: encoding.non_events,
        churn_unmapped: encoding.unmapped,
        dropped_rows: encoding.dropped_rows,
        identifier_dropped,
    };

    Ok((frame, report))
}

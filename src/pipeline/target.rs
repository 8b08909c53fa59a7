//! Target column analysis and mapping
//!
//! Converts the churn label column to the 0/1 indicator the aggregations
//! average over. Labels outside the mapping are handled by an
//! [`UnmappedLabelPolicy`].

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// How many distinct unmapped labels an error message quotes
const MAX_EXAMPLES: usize = 3;

/// Mapping configuration for converting target column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl TargetMapping {
    /// Create a new target mapping
    pub fn new(event_value: String, non_event_value: String) -> Self {
        Self {
            event_value,
            non_event_value,
        }
    }
}

impl Default for TargetMapping {
    /// `Yes` churned, `No` stayed
    fn default() -> Self {
        Self::new("Yes".to_string(), "No".to_string())
    }
}

/// What to do with target values that match neither side of the mapping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnmappedLabelPolicy {
    /// Keep the row with a null indicator and log a warning
    #[default]
    Null,
    /// Remove the row from the table
    Drop,
    /// Fail the load
    Reject,
}

impl FromStr for UnmappedLabelPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "null" => Ok(Self::Null),
            "drop" => Ok(Self::Drop),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown policy '{}': expected one of null, drop, reject",
                other
            )),
        }
    }
}

impl fmt::Display for UnmappedLabelPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Null => "null",
            Self::Drop => "drop",
            Self::Reject => "reject",
        };
        write!(f, "{}", s)
    }
}

/// Result of analyzing a target column
#[derive(Debug, Clone)]
pub enum TargetAnalysis {
    /// Target column is already binary 0/1, no mapping needed
    AlreadyBinary,
    /// Target column needs mapping - contains these unique values
    NeedsMapping { unique_values: Vec<String> },
}

/// Table with an encoded target column plus label counts
#[derive(Debug, Clone)]
pub struct TargetEncoding {
    pub frame: DataFrame,
    pub events: usize,
    pub non_events: usize,
    pub unmapped: usize,
    /// Rows removed under [`UnmappedLabelPolicy::Drop`]
    pub dropped_rows: usize,
}

/// Analyze a target column to determine if it needs value mapping
///
/// # Returns
/// - `AlreadyBinary` if the column is numeric and contains only 0 and 1 values
/// - `NeedsMapping` with the sorted unique values otherwise
pub fn analyze_target_column(df: &DataFrame, target: &str) -> Result<TargetAnalysis> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    // Check for empty or all-null column first
    if target_col.len() == 0 {
        anyhow::bail!("Target column '{}' is empty", target);
    }

    if target_col.null_count() == target_col.len() {
        anyhow::bail!("Target column '{}' contains only null values", target);
    }

    if target_col.dtype().is_primitive_numeric() {
        let float_col = target_col.cast(&DataType::Float64)?;
        let unique = float_col.unique()?;
        let unique_values: Vec<f64> = unique.f64()?.into_iter().flatten().collect();

        let is_binary = unique_values.len() <= 2
            && unique_values
                .iter()
                .all(|&v| v.abs() < TOLERANCE || (v - 1.0).abs() < TOLERANCE);

        if is_binary {
            return Ok(TargetAnalysis::AlreadyBinary);
        }
    }

    let mut unique_values: Vec<String> = column_to_string_vec(&target_col.unique()?)?
        .into_iter()
        .flatten()
        .collect();
    unique_values.sort();

    Ok(TargetAnalysis::NeedsMapping { unique_values })
}

/// Create a binary target mask based on the mapping
///
/// Returns a Vec<Option<i32>> where:
/// - Some(1) for event values
/// - Some(0) for non-event values
/// - None for nulls and values that don't match either
pub fn create_target_mask(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<Vec<Option<i32>>> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    let string_values = column_to_string_vec(target_col)?;

    let mask: Vec<Option<i32>> = string_values
        .iter()
        .map(|v| match v {
            Some(s) if s == &mapping.event_value => Some(1),
            Some(s) if s == &mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    Ok(mask)
}

/// Convert a column to a Vec of Option<String> for comparison
pub(crate) fn column_to_string_vec(col: &Column) -> Result<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            // For other types, try to cast to string
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}

/// Count how many records match the event and non-event values
pub fn count_mapped_records(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
) -> Result<(usize, usize, usize)> {
    let mask = create_target_mask(df, target, mapping)?;
    Ok(count_mask(&mask))
}

fn count_mask(mask: &[Option<i32>]) -> (usize, usize, usize) {
    let events = mask.iter().filter(|v| **v == Some(1)).count();
    let non_events = mask.iter().filter(|v| **v == Some(0)).count();
    let ignored = mask.iter().filter(|v| v.is_none()).count();
    (events, non_events, ignored)
}

/// Replace the target column with its 0/1 encoding.
///
/// A column that is already numeric 0/1 is only cast to `Int32`, so encoding
/// an encoded table changes nothing.
pub fn encode_target(
    df: &DataFrame,
    target: &str,
    mapping: &TargetMapping,
    policy: UnmappedLabelPolicy,
) -> Result<TargetEncoding> {
    let target_col = df
        .column(target)
        .with_context(|| format!("Target column '{}' not found", target))?;

    let already_binary = target_col.null_count() < target_col.len()
        && matches!(
            analyze_target_column(df, target)?,
            TargetAnalysis::AlreadyBinary
        );

    let mask: Vec<Option<i32>> = if already_binary {
        let cast = target_col.cast(&DataType::Int32)?;
        cast.i32()?.into_iter().collect()
    } else {
        create_target_mask(df, target, mapping)?
    };
    let (events, non_events, unmapped) = count_mask(&mask);

    if unmapped > 0 {
        let examples = unmapped_examples(target_col, &mask)?;
        match policy {
            UnmappedLabelPolicy::Reject => {
                return Err(PipelineError::UnmappedLabels {
                    column: target.to_string(),
                    count: unmapped,
                    examples,
                }
                .into());
            }
            UnmappedLabelPolicy::Null => log::warn!(
                "{} value(s) in '{}' match neither '{}' nor '{}' (e.g. {}); kept with a null indicator",
                unmapped,
                target,
                mapping.event_value,
                mapping.non_event_value,
                examples.join(", ")
            ),
            UnmappedLabelPolicy::Drop => log::warn!(
                "dropping {} row(s) whose '{}' matches neither '{}' nor '{}' (e.g. {})",
                unmapped,
                target,
                mapping.event_value,
                mapping.non_event_value,
                examples.join(", ")
            ),
        }
    }

    let mut frame = df.clone();
    frame.with_column(Column::new(target_col.name().clone(), mask.clone()))?;

    let dropped_rows = if policy == UnmappedLabelPolicy::Drop && unmapped > 0 {
        let keep: BooleanChunked = mask.iter().map(|v| v.is_some()).collect();
        frame = frame.filter(&keep)?;
        unmapped
    } else {
        0
    };

    Ok(TargetEncoding {
        frame,
        events,
        non_events,
        unmapped,
        dropped_rows,
    })
}

fn unmapped_examples(col: &Column, mask: &[Option<i32>]) -> Result<Vec<String>> {
    let mut examples: Vec<String> = Vec::new();
    for (value, encoded) in column_to_string_vec(col)?.into_iter().zip(mask) {
        if encoded.is_some() {
            continue;
        }
        let label = value.unwrap_or_else(|| "<null>".to_string());
        if !examples.contains(&label) {
            examples.push(label);
        }
        if examples.len() == MAX_EXAMPLES {
            break;
        }
    }
    Ok(examples)
}

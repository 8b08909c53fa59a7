//! The cleaned churn table, built once at startup and borrowed afterwards

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use polars::prelude::*;

use super::clean::{clean_dataset, CleaningOptions, CleaningReport};
use super::error::PipelineError;
use super::loader::{load_dataset_with_progress, DatasetStats};
use super::schema::{FilterField, REQUIRED_COLUMNS};

/// Cleaned churn records plus the values each filter can take
#[derive(Debug, Clone)]
pub struct ChurnDataset {
    frame: DataFrame,
    universes: BTreeMap<FilterField, Vec<String>>,
    cleaning: CleaningReport,
    source: Option<PathBuf>,
}

impl ChurnDataset {
    /// Load, clean and index a dataset file
    pub fn load(
        path: &Path,
        infer_schema_length: usize,
        options: &CleaningOptions,
    ) -> Result<(Self, DatasetStats)> {
        let (raw, stats) = load_dataset_with_progress(path, infer_schema_length)?;
        let mut dataset = Self::from_frame(&raw, options)?;
        dataset.source = Some(path.to_path_buf());
        Ok((dataset, stats))
    }

    /// Clean and index an in-memory table
    pub fn from_frame(raw: &DataFrame, options: &CleaningOptions) -> Result<Self> {
        check_required_columns(raw)?;

        let (frame, cleaning) = clean_dataset(raw, options)?;

        let mut universes = BTreeMap::new();
        for field in FilterField::ALL {
            universes.insert(field, distinct_values(frame.column(field.column())?)?);
        }

        log::info!(
            "dataset ready: {} rows; {} churned, {} retained, {} unlabeled",
            frame.height(),
            cleaning.churn_events,
            cleaning.churn_non_events,
            cleaning.churn_unmapped.saturating_sub(cleaning.dropped_rows)
        );

        Ok(Self {
            frame,
            universes,
            cleaning,
            source: None,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Distinct non-null values of a filter column, in first-appearance order
    pub fn universe(&self, field: FilterField) -> &[String] {
        self.universes
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn cleaning_report(&self) -> &CleaningReport {
        &self.cleaning
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}

fn check_required_columns(df: &DataFrame) -> Result<()> {
    let present: HashSet<&str> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::MissingColumns(missing).into())
    }
}

/// Distinct non-null values as text, in order of first appearance
fn distinct_values(col: &Column) -> Result<Vec<String>> {
    let text = col.cast(&DataType::String)?;
    let unique = text.as_materialized_series().unique_stable()?;
    Ok(unique
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect())
}

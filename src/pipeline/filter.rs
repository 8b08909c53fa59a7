//! Row filtering by per-field membership
//!
//! A row passes when its value in every filter field is in that field's
//! selected set. An empty or absent set therefore matches nothing.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use polars::prelude::*;
use serde::Serialize;

use super::dataset::ChurnDataset;
use super::schema::FilterField;

/// Selected values per filter field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FilterSelection {
    selected: BTreeMap<FilterField, BTreeSet<String>>,
}

impl FilterSelection {
    /// Every field present with nothing selected
    pub fn none() -> Self {
        Self {
            selected: FilterField::ALL
                .iter()
                .map(|field| (*field, BTreeSet::new()))
                .collect(),
        }
    }

    /// Every value of every field selected
    pub fn all(dataset: &ChurnDataset) -> Self {
        let mut selection = Self::none();
        for field in FilterField::ALL {
            selection.select_all(field, dataset);
        }
        selection
    }

    /// Replace the selected set of a field
    pub fn set<I, S>(&mut self, field: FilterField, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected
            .insert(field, values.into_iter().map(Into::into).collect());
    }

    /// Keep only `values` for a field, returning those that are not in the
    /// dataset's universe. They stay selected but match no row.
    pub fn restrict(
        &mut self,
        field: FilterField,
        values: &[String],
        dataset: &ChurnDataset,
    ) -> Vec<String> {
        let universe = dataset.universe(field);
        let unknown: Vec<String> = values
            .iter()
            .filter(|v| !universe.contains(v))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            log::warn!(
                "{} has no value(s) {:?}; they will match no rows",
                field.column(),
                unknown
            );
        }
        self.set(field, values.iter().cloned());
        unknown
    }

    /// Flip one value; returns whether it is selected afterwards
    pub fn toggle(&mut self, field: FilterField, value: &str) -> bool {
        let set = self.selected.entry(field).or_default();
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    pub fn select_all(&mut self, field: FilterField, dataset: &ChurnDataset) {
        self.set(field, dataset.universe(field).iter().cloned());
    }

    pub fn clear(&mut self, field: FilterField) {
        self.selected.insert(field, BTreeSet::new());
    }

    pub fn is_selected(&self, field: FilterField, value: &str) -> bool {
        self.selected
            .get(&field)
            .is_some_and(|set| set.contains(value))
    }

    pub fn selected(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.selected.get(&field)
    }

    /// True when every field selects exactly its full universe
    pub fn is_everything(&self, dataset: &ChurnDataset) -> bool {
        FilterField::ALL.iter().all(|field| {
            let universe = dataset.universe(*field);
            self.selected
                .get(field)
                .is_some_and(|set| set.len() == universe.len() && universe.iter().all(|v| set.contains(v)))
        })
    }
}

/// Predicate that holds where all four fields have a selected value.
///
/// Field values are compared as text, so `SeniorCitizen` matches "0" and "1".
/// Null field values never match.
pub fn selection_predicate(selection: &FilterSelection) -> Expr {
    FilterField::ALL
        .iter()
        .map(|field| {
            let values: Vec<String> = selection
                .selected(*field)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            col(field.column())
                .cast(DataType::String)
                .is_in(lit(Series::new(field.column().into(), values)))
        })
        .reduce(|acc, condition| acc.and(condition))
        .unwrap_or_else(|| lit(true))
        .fill_null(lit(false))
}

/// Row mask: true where all four fields hold a selected value
pub fn filter_mask(df: &DataFrame, selection: &FilterSelection) -> Result<BooleanChunked> {
    let keep = df
        .clone()
        .lazy()
        .select([selection_predicate(selection).alias("keep")])
        .collect()
        .context("Failed to evaluate filter selection")?;
    Ok(keep.column("keep")?.bool()?.clone())
}

/// Apply the selection to a table
pub fn apply_filters(df: &DataFrame, selection: &FilterSelection) -> Result<DataFrame> {
    df.clone()
        .lazy()
        .filter(selection_predicate(selection))
        .collect()
        .context("Failed to filter rows")
}

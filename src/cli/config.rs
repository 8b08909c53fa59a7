//! Resolved run configuration built from the command line

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::pipeline::{AggregationOptions, CleaningOptions, FilterField, TargetMapping};

use super::args::{Cli, OutputMode};

/// Everything the pipeline and front-ends need, decoupled from clap
#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub input: PathBuf,
    pub mode: OutputMode,
    pub infer_schema_length: usize,
    pub cleaning: CleaningOptions,
    pub aggregation: AggregationOptions,
    /// Initial restrictions; fields not listed start fully selected
    pub initial_filters: BTreeMap<FilterField, Vec<String>>,
    pub pick_filters: bool,
}

impl From<&Cli> for DashboardConfig {
    fn from(cli: &Cli) -> Self {
        let initial_filters = FilterField::ALL
            .iter()
            .filter_map(|field| {
                let values: Vec<String> = cli
                    .filter_values(*field)
                    .iter()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect();
                (!values.is_empty()).then_some((*field, values))
            })
            .collect();

        Self {
            input: cli.input.clone(),
            mode: cli.mode,
            infer_schema_length: cli.infer_schema_length,
            cleaning: CleaningOptions {
                mapping: TargetMapping::new(cli.event_value.clone(), cli.non_event_value.clone()),
                unmapped_policy: cli.unmapped_labels,
            },
            aggregation: AggregationOptions {
                histogram_bins: cli.bins,
            },
            initial_filters,
            pick_filters: cli.pick_filters,
        }
    }
}

impl DashboardConfig {
    /// Short description of the label mapping for the config card
    pub fn mapping_label(&self) -> String {
        format!(
            "'{}' → 1, '{}' → 0",
            self.cleaning.mapping.event_value, self.cleaning.mapping.non_event_value
        )
    }
}

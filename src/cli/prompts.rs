//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::MultiSelect;

use crate::pipeline::{ChurnDataset, FilterField, FilterSelection};

/// Ask for the values of every filter field, starting from `current`
pub fn prompt_filter_selection(
    dataset: &ChurnDataset,
    current: &FilterSelection,
) -> Result<FilterSelection> {
    let mut selection = current.clone();

    for field in FilterField::ALL {
        let items = dataset.universe(field);
        if items.is_empty() {
            continue;
        }
        let defaults: Vec<bool> = items
            .iter()
            .map(|v| current.is_selected(field, v))
            .collect();

        let chosen = MultiSelect::new()
            .with_prompt(field.label())
            .items(items)
            .defaults(&defaults)
            .interact()?;

        selection.set(field, chosen.into_iter().map(|i| items[i].clone()));
    }

    Ok(selection)
}

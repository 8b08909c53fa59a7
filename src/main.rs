//! churnscope: Telco customer churn dashboard CLI
//!
//! Loads and cleans a churn dataset, then shows the filtered dashboard as an
//! interactive terminal UI, a printed report, or JSON.

use std::io;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use churnscope::cli::{prompt_filter_selection, run_dashboard, Cli, DashboardConfig, OutputMode};
use churnscope::pipeline::{compute_dashboard, ChurnDataset, FilterSelection};
use churnscope::report::{display_cleaning, display_dashboard, DashboardExport};
use churnscope::utils::{
    print_banner, print_completion, print_config, print_section_header, print_success,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let config = DashboardConfig::from(&cli);
    log::debug!("resolved configuration: {:?}", config);

    match config.mode {
        OutputMode::Json => run_json(&config),
        OutputMode::Report => run_report(&config),
        OutputMode::Tui => run_tui(&config),
    }
}

/// Load the dataset and build the starting selection from the command line
fn prepare(config: &DashboardConfig) -> Result<(ChurnDataset, FilterSelection)> {
    let (dataset, stats) =
        ChurnDataset::load(&config.input, config.infer_schema_length, &config.cleaning)?;
    log::info!(
        "dataset ready: {} rows, {} columns, {:.2} MB",
        stats.rows,
        stats.columns,
        stats.memory_mb
    );

    let mut selection = FilterSelection::all(&dataset);
    for (field, values) in &config.initial_filters {
        selection.restrict(*field, values, &dataset);
    }

    Ok((dataset, selection))
}

fn run_json(config: &DashboardConfig) -> Result<()> {
    let (dataset, selection) = prepare(config)?;
    let view = compute_dashboard(&dataset, &selection, &config.aggregation)?;

    let input_file = dataset.source().map(|p| p.display().to_string());
    let export = DashboardExport::new(input_file, &selection, dataset.cleaning_report(), &view);
    export.write_to(io::stdout().lock())
}

fn run_report(config: &DashboardConfig) -> Result<()> {
    let start = Instant::now();

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &config.input,
        &config.mapping_label(),
        &config.cleaning.unmapped_policy.to_string(),
        config.aggregation.histogram_bins,
    );

    let (dataset, mut selection) = prepare(config)?;
    print_success(&format!(
        "Loaded {} customers from {}",
        dataset.height(),
        config.input.display()
    ));

    display_cleaning(dataset.cleaning_report());

    if config.pick_filters {
        print_section_header("Choose Filters");
        selection = prompt_filter_selection(&dataset, &selection)?;
    }

    let view = compute_dashboard(&dataset, &selection, &config.aggregation)?;
    display_dashboard(&view, &selection);

    log::info!("report finished in {:.2}s", start.elapsed().as_secs_f64());
    print_completion();
    Ok(())
}

fn run_tui(config: &DashboardConfig) -> Result<()> {
    let (dataset, selection) = prepare(config)?;
    let final_selection = run_dashboard(&dataset, selection, config.aggregation)?;
    log::debug!("final selection: {:?}", final_selection);
    Ok(())
}

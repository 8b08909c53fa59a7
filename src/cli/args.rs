//! Command-line argument definitions using clap

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::pipeline::{FilterField, UnmappedLabelPolicy, DEFAULT_HISTOGRAM_BINS};

/// Default dataset file name of the public Telco churn sample
pub const DEFAULT_INPUT: &str = "WA_Fn-UseC_-Telco-Customer-Churn.csv";

/// How the dashboard is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Interactive terminal dashboard with a filter sidebar
    Tui,
    /// Print every panel as tables and exit
    Report,
    /// Print the dashboard as JSON on stdout and exit
    Json,
}

/// churnscope - explore customer churn with filters and aggregate charts
#[derive(Parser, Debug)]
#[command(name = "churnscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long, default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Presentation mode
    #[arg(short, long, value_enum, default_value_t = OutputMode::Tui)]
    pub mode: OutputMode,

    /// Contract types to include (comma-separated). Default: all.
    #[arg(long, value_delimiter = ',')]
    pub contract: Vec<String>,

    /// Payment methods to include (comma-separated). Default: all.
    #[arg(long, value_delimiter = ',')]
    pub payment_method: Vec<String>,

    /// Senior citizen flags to include, 0 and/or 1 (comma-separated). Default: all.
    #[arg(long, value_delimiter = ',')]
    pub senior_citizen: Vec<String>,

    /// Internet service types to include (comma-separated). Default: all.
    #[arg(long, value_delimiter = ',')]
    pub internet_service: Vec<String>,

    /// Value in the Churn column that means the customer left (maps to 1)
    #[arg(long, default_value = "Yes")]
    pub event_value: String,

    /// Value in the Churn column that means the customer stayed (maps to 0)
    #[arg(long, default_value = "No")]
    pub non_event_value: String,

    /// What to do with Churn values matching neither label: null, drop or reject
    #[arg(long, default_value = "null")]
    pub unmapped_labels: UnmappedLabelPolicy,

    /// Number of bins for the monthly charges histogram
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS, value_parser = validate_bins)]
    pub bins: usize,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// In report mode, choose filters interactively before printing
    #[arg(long, default_value = "false")]
    pub pick_filters: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Values passed for a filter field; empty means "everything"
    pub fn filter_values(&self, field: FilterField) -> &[String] {
        match field {
            FilterField::Contract => &self.contract,
            FilterField::PaymentMethod => &self.payment_method,
            FilterField::SeniorCitizen => &self.senior_citizen,
            FilterField::InternetService => &self.internet_service,
        }
    }

    /// Log level implied by `-v` flags, overridable with `RUST_LOG`
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Validator for the histogram bin count
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if !(1..=200).contains(&value) {
        Err(format!("bins must be between 1 and 200, got {}", value))
    } else {
        Ok(value)
    }
}

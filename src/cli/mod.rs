//! CLI module - argument parsing, run configuration and interactive front-ends

pub mod args;
pub mod config;
pub mod dashboard;
pub mod prompts;

pub use args::{Cli, OutputMode, DEFAULT_INPUT};
pub use config::DashboardConfig;
pub use dashboard::{run_dashboard, DashboardApp, Page};
pub use prompts::prompt_filter_selection;
